use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::lenient::{deserialize_count, deserialize_flexible_bool, deserialize_optional_string};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

impl MaritalStatus {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("married") {
            MaritalStatus::Married
        } else {
            MaritalStatus::Single
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaritalStatus::Single => write!(f, "single"),
            MaritalStatus::Married => write!(f, "married"),
        }
    }
}

// Anything other than "married" reads as single
impl<'de> Deserialize<'de> for MaritalStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = deserialize_optional_string(deserializer)?;
        Ok(raw.as_deref().map(MaritalStatus::parse).unwrap_or_default())
    }
}

/// Household composition used to pick the compensation column and add-ons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DependentProfile {
    #[serde(default)]
    pub marital_status: MaritalStatus,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub children_under_18: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub children_over_18_school: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub dependent_parents: u32,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub spouse_aid_attendance: bool,
    #[serde(default, deserialize_with = "deserialize_count", rename = "smcKAwards")]
    pub smc_k_awards: u32,
}

impl DependentProfile {
    pub fn has_spouse(&self) -> bool {
        self.marital_status == MaritalStatus::Married
    }

    pub fn total_dependents(&self) -> u32 {
        u32::from(self.has_spouse())
            + self.children_under_18
            + self.children_over_18_school
            + self.dependent_parents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_field_names() {
        let d: DependentProfile = serde_json::from_str(
            r#"{"maritalStatus":"married","childrenUnder18":2,"childrenOver18School":"1",
                "dependentParents":null,"spouseAidAttendance":"true","smcKAwards":1}"#,
        )
        .expect("parse dependents");
        assert!(d.has_spouse());
        assert_eq!(d.children_under_18, 2);
        assert_eq!(d.children_over_18_school, 1);
        assert_eq!(d.dependent_parents, 0);
        assert!(d.spouse_aid_attendance);
        assert_eq!(d.smc_k_awards, 1);
        assert_eq!(d.total_dependents(), 4);
    }

    #[test]
    fn test_missing_fields_default() {
        let d: DependentProfile = serde_json::from_str("{}").expect("parse");
        assert_eq!(d, DependentProfile::default());
        assert_eq!(d.marital_status, MaritalStatus::Single);
    }

    #[test]
    fn test_negative_counts_become_zero() {
        let d: DependentProfile =
            serde_json::from_str(r#"{"childrenUnder18":-3,"maritalStatus":"divorced"}"#)
                .expect("parse");
        assert_eq!(d.children_under_18, 0);
        assert!(!d.has_spouse());
    }

    #[test]
    fn test_serializes_smc_k_name() {
        let json = serde_json::to_value(DependentProfile::default()).expect("serialize");
        assert!(json.get("smcKAwards").is_some());
        assert_eq!(json["maritalStatus"], "single");
    }
}
