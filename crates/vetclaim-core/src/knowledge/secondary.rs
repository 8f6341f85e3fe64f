//! Secondary conditions commonly claimed alongside a primary disability.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How often a secondary claim succeeds for a given primary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum Chance {
    High,
    Medium,
    Low,
}

impl fmt::Display for Chance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Chance::High => "High",
            Chance::Medium => "Medium",
            Chance::Low => "Low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryCondition {
    pub name: &'static str,
    pub chance: Chance,
}

const fn sc(name: &'static str, chance: Chance) -> SecondaryCondition {
    SecondaryCondition { name, chance }
}

use Chance::{High, Low, Medium};

/// Primary-condition keys in match priority order. A disability name is
/// matched against these by lowercase substring, first key wins.
pub const SECONDARY_CONDITIONS: &[(&str, &[SecondaryCondition])] = &[
    (
        "tinnitus",
        &[
            sc("Anxiety", High),
            sc("Depression", High),
            sc("Migraines", Medium),
            sc("Sleep Apnea", Medium),
            sc("Insomnia", High),
            sc("Meniere's Disease", Low),
            sc("Somatic Symptom Disorder", Medium),
            sc("Hyperacusis", Low),
        ],
    ),
    (
        "radiculopathy",
        &[
            sc("Sciatica", High),
            sc("Foot Drop", Medium),
            sc("Gait Abnormalities", Medium),
            sc("Bladder Dysfunction", Low),
            sc("Bowel Dysfunction", Low),
            sc("Erectile Dysfunction", Medium),
            sc("Depression", High),
            sc("Chronic Pain Syndrome", High),
            sc("Peripheral Neuropathy", Medium),
        ],
    ),
    (
        "ptsd",
        &[
            sc("Sleep Apnea", High),
            sc("Gastroesophageal Reflux Disease (GERD)", Medium),
            sc("Migraines", High),
            sc("Erectile Dysfunction", Medium),
            sc("Anxiety", High),
            sc("Depression", High),
            sc("Irritable Bowel Syndrome (IBS)", Medium),
            sc("Bruxism (Teeth Grinding)", Medium),
            sc("Dry Mouth", Low),
        ],
    ),
    (
        "migraines",
        &[
            sc("Anxiety", High),
            sc("Depression", High),
            sc("Allergic Rhinitis", Low),
            sc("Tinnitus", Low),
            sc("Photophobia", High),
            sc("Blurred Vision", Medium),
        ],
    ),
    (
        "sleep apnea",
        &[
            sc("Hypertension", High),
            sc("Gastroesophageal Reflux Disease (GERD)", Medium),
            sc("Asthma", Low),
            sc("Depression", High),
            sc("Nocturia", Medium),
        ],
    ),
    (
        "back condition",
        &[
            sc("Radiculopathy", High),
            sc("Sciatica", High),
            sc("Hip Pain", Medium),
            sc("Knee Pain", Medium),
            sc("Ankle Instability", Low),
            sc("Depression", High),
            sc("Anxiety", High),
            sc("Erectile Dysfunction", Medium),
            sc("Urinary Incontinence", Low),
            sc("Plantar Fasciitis", Medium),
            sc("Flat Feet", Low),
            sc("Arthritis", High),
        ],
    ),
    (
        "hypertension",
        &[
            sc("Stroke", Medium),
            sc("Kidney Disease", High),
            sc("Heart Disease", High),
            sc("Erectile Dysfunction", Medium),
        ],
    ),
    (
        "diabetes mellitus",
        &[
            sc("Peripheral Neuropathy", High),
            sc("Retinopathy", High),
            sc("Nephropathy (Kidney Disease)", High),
            sc("Erectile Dysfunction", High),
            sc("Heart Disease", Medium),
            sc("Blurred Vision", High),
            sc("Frequent Urination", High),
            sc("Gout", Medium),
        ],
    ),
    (
        "traumatic brain injury (tbi)",
        &[
            sc("Migraines", High),
            sc("Seizures", Medium),
            sc("Depression", High),
            sc("Anxiety", High),
            sc("Cognitive Impairment", High),
            sc("Parkinson's Disease", Low),
            sc("Photophobia", High),
        ],
    ),
    (
        "chronic sinusitis",
        &[
            sc("Obstructive Sleep Apnea", Medium),
            sc("Anosmia (Loss of Smell)", High),
        ],
    ),
    (
        "allergic rhinitis",
        &[
            sc("Obstructive Sleep Apnea", Medium),
            sc("Chronic Sinusitis", High),
        ],
    ),
    (
        "chronic pain",
        &[
            sc("Depression", High),
            sc("Anxiety", High),
            sc("Insomnia", High),
            sc("Erectile Dysfunction", Medium),
            sc("Ulcers", Medium),
        ],
    ),
];

/// Find the secondary list for a disability name, if any key matches.
pub fn secondaries_for(disability_name: &str) -> Option<(&'static str, &'static [SecondaryCondition])> {
    let lower = disability_name.to_lowercase();
    SECONDARY_CONDITIONS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(key, list)| (*key, *list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let (key, list) = secondaries_for("Chronic PTSD, combat related").expect("ptsd matches");
        assert_eq!(key, "ptsd");
        assert_eq!(list[0].name, "Sleep Apnea");
        assert_eq!(list[0].chance, Chance::High);
    }

    #[test]
    fn test_first_key_wins() {
        // Contains both "tinnitus" and "migraines"; tinnitus is declared first
        let (key, _) = secondaries_for("Tinnitus with migraines").expect("matches");
        assert_eq!(key, "tinnitus");
    }

    #[test]
    fn test_no_match() {
        assert!(secondaries_for("Left knee strain").is_none());
        assert!(secondaries_for("").is_none());
    }

    #[test]
    fn test_every_key_is_lowercase() {
        for (key, list) in SECONDARY_CONDITIONS {
            assert_eq!(*key, key.to_lowercase());
            assert!(!list.is_empty());
        }
        assert_eq!(SECONDARY_CONDITIONS.len(), 12);
    }
}
