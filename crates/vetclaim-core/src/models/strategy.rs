//! Claim strategy records: generated increase plans and suggested new claims.

use serde::{Deserialize, Serialize};

use super::lenient::{deserialize_prose, deserialize_string_or_empty};
use crate::knowledge::Chance;

/// Evidence to gather for the next rating level. All `None` when the
/// condition is already at its maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ActionSteps {
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub crucial_evidence: Option<String>,
    #[serde(default, alias = "highLevelDocumentation", deserialize_with = "deserialize_prose")]
    pub documentation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub statements: Option<String>,
}

impl ActionSteps {
    pub fn is_empty(&self) -> bool {
        self.crucial_evidence.is_none() && self.documentation.is_none() && self.statements.is_none()
    }
}

/// How an existing rating could be increased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct IncreaseStrategy {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    /// As returned, e.g. `"30%"` or `30`.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub current_rating: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub next_rating: String,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub criteria_for_next_rating: Option<String>,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub how_to_increase: Option<String>,
    #[serde(default)]
    pub action_steps: Option<ActionSteps>,
}

impl IncreaseStrategy {
    /// Next rating equals current when the condition is maxed out.
    pub fn is_at_maximum(&self) -> bool {
        !self.current_rating.is_empty() && self.current_rating == self.next_rating
    }
}

/// Official criteria for one rating level of a condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RatingCriterion {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub rating: String,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub criteria: Option<String>,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub how_to_increase: Option<String>,
    #[serde(default)]
    pub action_steps: Option<ActionSteps>,
}

/// Explanation of a suggested secondary condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SecondaryDetails {
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub what_it_is: Option<String>,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub how_its_connected: Option<String>,
    #[serde(default)]
    pub what_to_do: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_prose")]
    pub how_to_file: Option<String>,
}

/// A presumptive condition the veteran's service and answers point to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PresumptiveSuggestion {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    /// Short label of the legal basis.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub act: String,
    /// The screening question the veteran answered yes to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_symptom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SuggestedCondition {
    pub name: String,
    pub chance: Chance,
}

/// Secondary conditions commonly claimed alongside one primary disability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SecondarySuggestion {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub primary_condition_name: String,
    #[serde(default)]
    pub suggested_secondaries: Vec<SuggestedCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct NewClaimSuggestions {
    #[serde(default)]
    pub presumptive_conditions: Vec<PresumptiveSuggestion>,
    #[serde(default)]
    pub secondary_conditions: Vec<SecondarySuggestion>,
}

impl NewClaimSuggestions {
    pub fn is_empty(&self) -> bool {
        self.presumptive_conditions.is_empty() && self.secondary_conditions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct StrategyData {
    #[serde(default)]
    pub potential_increases: Vec<IncreaseStrategy>,
    #[serde(default)]
    pub potential_new_claims: NewClaimSuggestions,
}

impl StrategyData {
    pub fn secondaries_for(&self, primary: &str) -> Option<&SecondarySuggestion> {
        self.potential_new_claims
            .secondary_conditions
            .iter()
            .find(|s| s.primary_condition_name.eq_ignore_ascii_case(primary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_strategy_with_null_steps() {
        let s: IncreaseStrategy = serde_json::from_str(
            r#"{"name":"Tinnitus","currentRating":"10%","nextRating":"10%",
                "howToIncrease":"10% is the maximum schedular rating.",
                "actionSteps":{"crucialEvidence":null,"documentation":null,"statements":null}}"#,
        )
        .expect("parse");
        assert!(s.is_at_maximum());
        assert!(s.action_steps.as_ref().is_some_and(ActionSteps::is_empty));
        assert!(s.criteria_for_next_rating.is_none());
    }

    #[test]
    fn test_numeric_ratings_become_strings() {
        let s: IncreaseStrategy =
            serde_json::from_str(r#"{"name":"PTSD","currentRating":50,"nextRating":70}"#)
                .expect("parse");
        assert_eq!(s.current_rating, "50");
        assert!(!s.is_at_maximum());
    }

    #[test]
    fn test_high_level_documentation_alias() {
        let steps: ActionSteps =
            serde_json::from_str(r#"{"highLevelDocumentation":"Treatment records"}"#).expect("parse");
        assert_eq!(steps.documentation.as_deref(), Some("Treatment records"));
    }

    #[test]
    fn test_strategy_data_defaults() {
        let data: StrategyData = serde_json::from_str(r#"{"potentialNewClaims":{}}"#).expect("parse");
        assert!(data.potential_increases.is_empty());
        assert!(data.potential_new_claims.is_empty());
    }

    #[test]
    fn test_secondaries_lookup_ignores_case() {
        let data = StrategyData {
            potential_new_claims: NewClaimSuggestions {
                secondary_conditions: vec![SecondarySuggestion {
                    primary_condition_name: "PTSD".into(),
                    suggested_secondaries: vec![SuggestedCondition {
                        name: "Sleep Apnea".into(),
                        chance: Chance::High,
                    }],
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(data.secondaries_for("ptsd").is_some());
        assert!(data.secondaries_for("tinnitus").is_none());
    }
}
