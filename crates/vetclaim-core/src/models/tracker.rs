use serde::{Deserialize, Serialize};

use super::lenient::{
    deserialize_flexible_bool, deserialize_optional_string, deserialize_record_id,
    deserialize_severity, deserialize_string_or_empty,
};
use crate::utils::csv_escape;

pub const SYMPTOM_CSV_HEADER: &str = "Date,Severity,Duration,Impact on Daily Activities,Notes";

fn default_severity() -> u8 {
    5
}

/// One diary entry for a condition's symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SymptomLog {
    #[serde(default, deserialize_with = "deserialize_record_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub date: String,
    /// 1 (mild) to 10 (severe).
    #[serde(default = "default_severity", deserialize_with = "deserialize_severity")]
    pub severity: u8,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub duration: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub impact: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub notes: String,
}

impl SymptomLog {
    pub fn new(date: impl Into<String>, severity: u8) -> Self {
        Self {
            id: 0,
            date: date.into(),
            severity: severity.clamp(1, 10),
            duration: String::new(),
            impact: String::new(),
            notes: String::new(),
        }
    }
}

/// Render logs as CSV, one row per entry in stored order, every cell quoted.
pub fn symptom_logs_csv(logs: &[SymptomLog]) -> String {
    let mut out = String::from(SYMPTOM_CSV_HEADER);
    for log in logs {
        out.push('\n');
        let cells = [
            csv_escape(&log.date),
            csv_escape(&log.severity.to_string()),
            csv_escape(&log.duration),
            csv_escape(&log.impact),
            csv_escape(&log.notes),
        ];
        out.push_str(&cells.join(","));
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Appointment {
    #[serde(default, deserialize_with = "deserialize_record_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub time: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub location: String,
    /// Claimed condition the appointment relates to, if any.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub condition: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub notes: String,
}

impl Appointment {
    /// Sort key: date then time, both as entered (ISO strings sort correctly).
    pub fn when(&self) -> (&str, &str) {
        (self.date.as_str(), self.time.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(default, deserialize_with = "deserialize_record_id")]
    pub id: i64,
    /// Older documents call this field `task`.
    #[serde(default, alias = "task", deserialize_with = "deserialize_string_or_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub completed: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_log_defaults() {
        let log: SymptomLog = serde_json::from_str(r#"{"date":"2024-05-01"}"#).expect("parse");
        assert_eq!(log.severity, 5);
        assert!(log.notes.is_empty());

        let log: SymptomLog =
            serde_json::from_str(r#"{"date":"2024-05-01","severity":"12"}"#).expect("parse");
        assert_eq!(log.severity, 10);
    }

    #[test]
    fn test_todo_accepts_task_alias() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":5,"task":"Request C-file","completed":"false"}"#)
                .expect("parse");
        assert_eq!(todo.text, "Request C-file");
        assert!(!todo.completed);
        assert!(todo.due_date.is_none());

        let json = serde_json::to_value(&todo).expect("serialize");
        assert_eq!(json["text"], "Request C-file");
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn test_appointment_sort_key() {
        let mut appts = vec![
            Appointment { id: 1, date: "2024-06-02".into(), time: "09:00".into(), ..Default::default() },
            Appointment { id: 2, date: "2024-06-01".into(), time: "14:00".into(), ..Default::default() },
        ];
        appts.sort_by(|a, b| a.when().cmp(&b.when()));
        assert_eq!(appts[0].id, 2);
    }

    #[test]
    fn test_symptom_csv() {
        let mut log = SymptomLog::new("2024-05-01", 7);
        log.duration = "2 hours".into();
        log.impact = "Left work early".into();
        log.notes = "Felt \"foggy\"".into();

        let csv = symptom_logs_csv(&[log]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(SYMPTOM_CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some(r#""2024-05-01","7","2 hours","Left work early","Felt ""foggy""""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_symptom_csv_empty() {
        assert_eq!(symptom_logs_csv(&[]), SYMPTOM_CSV_HEADER);
    }
}
