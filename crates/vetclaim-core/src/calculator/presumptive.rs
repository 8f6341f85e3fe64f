//! Presumptive eligibility: does a service period overlap any exposure window?

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::knowledge::PresumptiveCategory;

/// A validated service period: release strictly after entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDateRange {
    pub entry_on_duty: NaiveDate,
    pub release_from_active_duty: NaiveDate,
}

impl ServiceDateRange {
    /// Returns `None` unless `release > entry`.
    pub fn new(entry_on_duty: NaiveDate, release_from_active_duty: NaiveDate) -> Option<Self> {
        (release_from_active_duty > entry_on_duty).then_some(Self {
            entry_on_duty,
            release_from_active_duty,
        })
    }

    pub fn from_options(entry: Option<NaiveDate>, release: Option<NaiveDate>) -> Option<Self> {
        Self::new(entry?, release?)
    }
}

/// One presumptive condition and the category that made it apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PresumptiveMatch {
    pub condition: String,
    pub category_label: String,
}

/// A condition with every category under which it qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MergedPresumptive {
    pub condition: String,
    pub legal_bases: Vec<String>,
}

fn overlapping<'a>(
    entry: NaiveDate,
    release: NaiveDate,
    categories: &'a [PresumptiveCategory],
) -> impl Iterator<Item = &'a PresumptiveCategory> {
    let valid = release > entry;
    categories.iter().filter(move |category| {
        valid
            && category
                .date_ranges
                .iter()
                .any(|range| range.overlaps(entry, release))
    })
}

/// True when service overlaps at least one window of any category.
/// Equal or inverted dates are never eligible.
pub fn is_eligible(entry: NaiveDate, release: NaiveDate, categories: &[PresumptiveCategory]) -> bool {
    overlapping(entry, release, categories).next().is_some()
}

/// Every condition of every overlapping category, in category order.
///
/// A condition listed by two overlapping categories appears twice, once per
/// legal basis.
pub fn matching_categories(
    entry: NaiveDate,
    release: NaiveDate,
    categories: &[PresumptiveCategory],
) -> Vec<PresumptiveMatch> {
    overlapping(entry, release, categories)
        .flat_map(|category| {
            category.conditions.iter().map(move |condition| PresumptiveMatch {
                condition: condition.clone(),
                category_label: category.short_label.clone(),
            })
        })
        .collect()
}

/// Group matches by condition name, keeping first-seen order.
pub fn merge_by_condition(matches: &[PresumptiveMatch]) -> Vec<MergedPresumptive> {
    let mut merged: Vec<MergedPresumptive> = Vec::new();
    for m in matches {
        match merged.iter_mut().find(|e| e.condition == m.condition) {
            Some(entry) => {
                if !entry.legal_bases.contains(&m.category_label) {
                    entry.legal_bases.push(m.category_label.clone());
                }
            }
            None => merged.push(MergedPresumptive {
                condition: m.condition.clone(),
                legal_bases: vec![m.category_label.clone()],
            }),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{category, presumptive_categories, ExposureWindow};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
    }

    fn agent_orange_only() -> Vec<PresumptiveCategory> {
        vec![category("agentOrange").expect("bundled").clone()]
    }

    #[test]
    fn test_vietnam_era_service_is_eligible() {
        assert!(is_eligible(date("1970-01-01"), date("1971-01-01"), &agent_orange_only()));
    }

    #[test]
    fn test_service_after_window_is_not_eligible() {
        assert!(!is_eligible(date("1980-01-01"), date("1981-01-01"), &agent_orange_only()));
    }

    #[test]
    fn test_inverted_or_equal_dates_are_never_eligible() {
        let all = presumptive_categories();
        assert!(!is_eligible(date("1971-01-01"), date("1970-01-01"), all));
        assert!(!is_eligible(date("1970-01-01"), date("1970-01-01"), all));
        assert!(matching_categories(date("1971-01-01"), date("1970-01-01"), all).is_empty());
    }

    #[test]
    fn test_entry_on_last_day_of_window_is_eligible() {
        let matches = matching_categories(date("1975-05-07"), date("1979-01-01"), &agent_orange_only());
        assert!(matches.iter().any(|m| m.category_label == "Agent Orange"));
        assert!(!is_eligible(date("1975-05-08"), date("1979-01-01"), &agent_orange_only()));
    }

    #[test]
    fn test_release_on_first_day_of_window_is_eligible() {
        let matches = matching_categories(date("1960-01-01"), date("1962-01-09"), &agent_orange_only());
        assert!(matches.iter().any(|m| m.category_label == "Agent Orange"));
        assert!(!is_eligible(date("1960-01-01"), date("1962-01-08"), &agent_orange_only()));
    }

    #[test]
    fn test_window_ending_day_before_entry_does_not_match() {
        let categories = vec![PresumptiveCategory {
            key: "test".to_string(),
            label: "Test exposure".to_string(),
            short_label: "Test".to_string(),
            conditions: vec!["Tinnitus".to_string()],
            date_ranges: vec![ExposureWindow {
                start: date("2000-01-01"),
                end: Some(date("2004-12-31")),
            }],
        }];
        assert!(!is_eligible(date("2005-01-01"), date("2008-01-01"), &categories));
        assert!(matching_categories(date("2005-01-01"), date("2008-01-01"), &categories).is_empty());
        assert!(is_eligible(date("2004-12-31"), date("2008-01-01"), &categories));
    }

    #[test]
    fn test_future_service_misses_open_windows() {
        let entry = chrono::Utc::now().date_naive() + chrono::Duration::days(366);
        let release = entry + chrono::Duration::days(365);
        let labels: Vec<String> = matching_categories(entry, release, presumptive_categories())
            .into_iter()
            .map(|m| m.category_label)
            .collect();
        assert!(!labels.iter().any(|l| l == "PACT Act" || l == "Gulf War"));
    }

    #[test]
    fn test_partial_overlap_counts() {
        // Served 1974-1978: only the tail end of the Vietnam window
        assert!(is_eligible(date("1974-06-01"), date("1978-06-01"), &agent_orange_only()));
    }

    #[test]
    fn test_matches_keep_duplicates_across_categories() {
        let matches = matching_categories(date("1970-01-01"), date("1971-01-01"), presumptive_categories());
        let diabetes: Vec<_> = matches.iter().filter(|m| m.condition == "Type 2 Diabetes").collect();
        assert_eq!(diabetes.len(), 2);
        assert_eq!(diabetes[0].category_label, "Agent Orange");
        assert_eq!(diabetes[1].category_label, "Blue Water Navy");
        // Camp Lejeune also covers 1970
        assert!(matches.iter().any(|m| m.category_label == "Camp Lejeune"));
        assert!(!matches.iter().any(|m| m.category_label == "PACT Act"));
    }

    #[test]
    fn test_open_ended_window_matches_recent_service() {
        let matches = matching_categories(date("2003-03-01"), date("2010-09-30"), presumptive_categories());
        let labels: Vec<&str> = matches.iter().map(|m| m.category_label.as_str()).collect();
        assert!(labels.contains(&"PACT Act"));
        assert!(labels.contains(&"Gulf War"));
        assert!(!labels.contains(&"Agent Orange"));
    }

    #[test]
    fn test_merge_by_condition() {
        let matches = matching_categories(date("1970-01-01"), date("1971-01-01"), presumptive_categories());
        let merged = merge_by_condition(&matches);
        let diabetes = merged
            .iter()
            .find(|m| m.condition == "Type 2 Diabetes")
            .expect("diabetes is presumptive in 1970");
        assert_eq!(diabetes.legal_bases, vec!["Agent Orange", "Blue Water Navy"]);
        assert!(merged.len() < matches.len());
    }

    #[test]
    fn test_service_range_requires_release_after_entry() {
        assert!(ServiceDateRange::new(date("1970-01-01"), date("1971-01-01")).is_some());
        assert!(ServiceDateRange::new(date("1971-01-01"), date("1970-01-01")).is_none());
        assert!(ServiceDateRange::from_options(Some(date("1970-01-01")), None).is_none());
    }
}
