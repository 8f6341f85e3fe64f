use serde::{Deserialize, Serialize};

use super::lenient::{deserialize_optional_string, deserialize_rating, deserialize_string_or_empty};
use super::profile::UserProfile;
use super::service::{parse_iso_date, ServiceDates};
use super::disability::Disability;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDisability {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,
}

/// Disabilities and service dates read out of a VA letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedClaimData {
    #[serde(default)]
    pub disabilities: Vec<ExtractedDisability>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub entry_on_duty_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub release_from_active_duty_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub added: Vec<String>,
    pub dates_set: bool,
}

impl ExtractionOutcome {
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || self.dates_set
    }
}

impl ExtractedClaimData {
    /// Both dates present and parseable.
    pub fn service_dates(&self) -> Option<ServiceDates> {
        let eod = self.entry_on_duty_date.as_deref()?;
        let rad = self.release_from_active_duty_date.as_deref()?;
        parse_iso_date(eod)?;
        parse_iso_date(rad)?;
        Some(ServiceDates::new(eod, rad))
    }

    /// Merge into a profile: only disabilities not already listed (by
    /// case-insensitive name) are added, and dates only when both were found.
    pub fn apply_to(&self, profile: &mut UserProfile) -> ExtractionOutcome {
        let mut outcome = ExtractionOutcome::default();

        for extracted in &self.disabilities {
            let name = extracted.name.trim();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            let known = profile
                .disabilities
                .iter()
                .any(|d| d.name.trim().to_lowercase() == key);
            if known {
                continue;
            }
            let id = profile.next_id();
            profile.disabilities.push(Disability::new(id, name, extracted.rating));
            outcome.added.push(name.to_string());
        }

        if let Some(dates) = self.service_dates() {
            profile.set_service_dates(dates);
            outcome.dates_set = true;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_output() {
        let data: ExtractedClaimData = serde_json::from_str(
            r#"{"disabilities":[{"name":"tinnitus","rating":10},{"name":"PTSD","rating":"70"}],
                "entryOnDutyDate":"2001-02-03","releaseFromActiveDutyDate":null}"#,
        )
        .expect("parse");
        assert_eq!(data.disabilities.len(), 2);
        assert_eq!(data.disabilities[1].rating, 70);
        assert!(data.service_dates().is_none());
    }

    #[test]
    fn test_apply_skips_known_names() {
        let mut profile = UserProfile::default();
        profile.add_disability("Tinnitus", 10).expect("add");

        let data = ExtractedClaimData {
            disabilities: vec![
                ExtractedDisability { name: " tinnitus ".into(), rating: 10 },
                ExtractedDisability { name: "PTSD".into(), rating: 70 },
                ExtractedDisability { name: "".into(), rating: 30 },
            ],
            entry_on_duty_date: Some("2001-02-03".into()),
            release_from_active_duty_date: Some("2005-02-03".into()),
        };
        let outcome = data.apply_to(&mut profile);
        assert_eq!(outcome.added, vec!["PTSD"]);
        assert!(outcome.dates_set);
        assert_eq!(profile.disabilities.len(), 2);
        assert_eq!(profile.service_dates.eod, "2001-02-03");
    }

    #[test]
    fn test_unparseable_dates_leave_profile_alone() {
        let mut profile = UserProfile::default();
        let data = ExtractedClaimData {
            entry_on_duty_date: Some("sometime in 2001".into()),
            release_from_active_duty_date: Some("2005-02-03".into()),
            ..Default::default()
        };
        let outcome = data.apply_to(&mut profile);
        assert!(!outcome.changed());
        assert!(!profile.service_dates.is_complete());
    }
}
