//! Presumptive exposure categories.
//!
//! Each category lists the conditions the VA presumes service-connected for
//! veterans who served during one of its exposure windows.

use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date window. `end: None` means the window is still open and
/// runs through today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ExposureWindow {
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub start: NaiveDate,
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub end: Option<NaiveDate>,
}

impl ExposureWindow {
    /// Inclusive overlap with a service interval; partial service counts.
    pub fn overlaps(&self, entry: NaiveDate, release: NaiveDate) -> bool {
        self.overlaps_on(entry, release, Utc::now().date_naive())
    }

    /// Overlap with an open window closed at `today`.
    pub fn overlaps_on(&self, entry: NaiveDate, release: NaiveDate, today: NaiveDate) -> bool {
        let end = self.end.unwrap_or(today);
        entry <= end && release >= self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PresumptiveCategory {
    pub key: String,
    pub label: String,
    pub short_label: String,
    pub conditions: Vec<String>,
    pub date_ranges: Vec<ExposureWindow>,
}

static CATEGORIES: OnceLock<Vec<PresumptiveCategory>> = OnceLock::new();

/// The bundled categories, built once on first use.
pub fn presumptive_categories() -> &'static [PresumptiveCategory] {
    CATEGORIES.get_or_init(build_categories)
}

/// Look up a bundled category by key (`agentOrange`, `pactAct`, ...).
pub fn category(key: &str) -> Option<&'static PresumptiveCategory> {
    presumptive_categories().iter().find(|c| c.key == key)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("bundled exposure dates are valid")
}

fn window(start: NaiveDate, end: Option<NaiveDate>) -> ExposureWindow {
    ExposureWindow { start, end }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const HERBICIDE_CONDITIONS: &[&str] = &[
    "Type 2 Diabetes",
    "Ischemic Heart Disease",
    "Parkinson’s Disease",
    "Hodgkin’s Disease",
    "Prostate Cancer",
    "AL Amyloidosis",
    "Chloracne",
    "Chronic B-cell Leukemias",
    "Multiple Myeloma",
    "Non-Hodgkin’s Lymphoma",
    "Peripheral Neuropathy, Early-Onset",
    "Porphyria Cutanea Tarda",
    "Respiratory Cancers",
    "Soft Tissue Sarcomas",
];

fn build_categories() -> Vec<PresumptiveCategory> {
    let gulf_war_start = date(1990, 8, 2);
    let vietnam = window(date(1962, 1, 9), Some(date(1975, 5, 7)));

    vec![
        PresumptiveCategory {
            key: "pactAct".to_string(),
            label: "PACT Act: Burn Pit & Toxic Exposure Presumptives".to_string(),
            short_label: "PACT Act".to_string(),
            conditions: strings(&[
                "Asthma (diagnosed after service)",
                "Chronic Bronchitis",
                "Chronic Obstructive Pulmonary Disease (COPD)",
                "Chronic Rhinitis",
                "Chronic Sinusitis",
                "Head Cancer",
                "Neck Cancer",
                "Respiratory Cancer",
                "Gastrointestinal Cancer",
                "Kidney Cancer",
                "Brain Cancer",
                "Melanoma",
                "Glioblastoma",
                "Granulomatous Disease",
                "Interstitial Lung Disease (ILD)",
                "Pleuritis",
                "Pulmonary Fibrosis",
                "Sarcoidosis",
            ]),
            date_ranges: vec![window(gulf_war_start, None)],
        },
        PresumptiveCategory {
            key: "agentOrange".to_string(),
            label: "Agent Orange Presumptive Conditions".to_string(),
            short_label: "Agent Orange".to_string(),
            conditions: strings(HERBICIDE_CONDITIONS),
            date_ranges: vec![vietnam],
        },
        PresumptiveCategory {
            key: "blueWaterNavy".to_string(),
            label: "Blue Water Navy Presumptives".to_string(),
            short_label: "Blue Water Navy".to_string(),
            conditions: strings(HERBICIDE_CONDITIONS),
            date_ranges: vec![vietnam],
        },
        PresumptiveCategory {
            key: "gulfWar".to_string(),
            label: "Gulf War & Southwest Asia Conditions".to_string(),
            short_label: "Gulf War".to_string(),
            conditions: strings(&[
                "Chronic Fatigue Syndrome",
                "Irritable Bowel Syndrome (IBS)",
                "Fibromyalgia",
                "Undiagnosed Illnesses",
            ]),
            date_ranges: vec![window(gulf_war_start, None)],
        },
        PresumptiveCategory {
            key: "campLejeune".to_string(),
            label: "Camp Lejeune Contaminated Water Exposure".to_string(),
            short_label: "Camp Lejeune".to_string(),
            conditions: strings(&[
                "Adult leukemia",
                "Aplastic anemia and other myelodysplastic syndromes",
                "Bladder cancer",
                "Kidney cancer",
                "Liver cancer",
                "Multiple myeloma",
                "Non-Hodgkin’s lymphoma",
                "Parkinson’s disease",
            ]),
            date_ranges: vec![window(date(1953, 8, 1), Some(date(1987, 12, 31)))],
        },
        PresumptiveCategory {
            key: "reca".to_string(),
            label: "Radiation Exposure Presumptives".to_string(),
            short_label: "Radiation Exposure".to_string(),
            conditions: strings(&[
                "Leukemia (other than chronic lymphocytic leukemia)",
                "Cancer of the thyroid",
                "Cancer of the breast",
                "Cancer of the pharynx",
                "Cancer of the esophagus",
                "Cancer of the stomach",
                "Cancer of the small intestine",
                "Cancer of the pancreas",
                "Multiple myeloma",
                "Lymphomas (except Hodgkin’s disease)",
                "Cancer of the bile ducts",
                "Cancer of the gall bladder",
                "Primary liver cancer",
                "Cancer of the salivary gland",
                "Cancer of the urinary tract",
            ]),
            date_ranges: vec![window(date(1945, 7, 16), Some(date(1962, 12, 31)))],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_categories() {
        let categories = presumptive_categories();
        assert_eq!(categories.len(), 6);
        assert!(categories.iter().all(|c| !c.conditions.is_empty()));
        assert!(categories.iter().all(|c| !c.date_ranges.is_empty()));
    }

    #[test]
    fn test_category_lookup() {
        let agent_orange = category("agentOrange").expect("agent orange is bundled");
        assert_eq!(agent_orange.short_label, "Agent Orange");
        assert_eq!(agent_orange.date_ranges[0].start, date(1962, 1, 9));
        assert_eq!(agent_orange.date_ranges[0].end, Some(date(1975, 5, 7)));
        assert!(category("unknown").is_none());
    }

    #[test]
    fn test_window_overlap_is_inclusive() {
        let w = window(date(1962, 1, 9), Some(date(1975, 5, 7)));
        // Release on the first day of the window
        assert!(w.overlaps(date(1960, 1, 1), date(1962, 1, 9)));
        // Entry on the last day of the window
        assert!(w.overlaps(date(1975, 5, 7), date(1979, 1, 1)));
        assert!(!w.overlaps(date(1975, 5, 8), date(1979, 1, 1)));
        assert!(!w.overlaps(date(1950, 1, 1), date(1962, 1, 8)));
    }

    #[test]
    fn test_open_window_runs_through_today() {
        let w = window(date(1990, 8, 2), None);
        assert!(w.overlaps(date(2020, 1, 1), date(2024, 1, 1)));
        assert!(!w.overlaps(date(1980, 1, 1), date(1990, 8, 1)));

        let today = date(2025, 6, 30);
        assert!(w.overlaps_on(date(2025, 6, 30), date(2026, 1, 1), today));
        assert!(!w.overlaps_on(date(2025, 7, 1), date(2026, 1, 1), today));
    }

    #[test]
    fn test_future_entry_misses_open_window() {
        let w = window(date(1990, 8, 2), None);
        let next_year = Utc::now().date_naive() + chrono::Duration::days(366);
        assert!(!w.overlaps(next_year, next_year + chrono::Duration::days(365)));
    }

    #[test]
    fn test_categories_serialize_camel_case() {
        let json = serde_json::to_value(category("gulfWar").expect("gulf war is bundled"))
            .expect("serialize category");
        assert_eq!(json["shortLabel"], "Gulf War");
        assert_eq!(json["dateRanges"][0]["start"], "1990-08-02");
        assert!(json["dateRanges"][0]["end"].is_null());
    }
}
