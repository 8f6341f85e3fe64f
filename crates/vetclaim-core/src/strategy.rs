//! Suggested new claims: screened presumptives and common secondaries.

use chrono::NaiveDate;
use tracing::debug;

use crate::calculator::{matching_categories, PresumptiveMatch};
use crate::error::StrategyError;
use crate::knowledge::{presumptive_categories, secondaries_for, PRESUMPTIVE_SYMPTOM_QUESTIONS};
use crate::models::{
    Disability, IncreaseStrategy, NewClaimSuggestions, PresumptiveSuggestion, SecondarySuggestion,
    StrategyData, SuggestedCondition, UserProfile,
};

/// Keep the presumptive matches the veteran's symptoms point to.
///
/// A match is kept when its lowercased condition contains the id of a symptom
/// answered yes. Symptom ids are tried in questionnaire order and the first
/// hit supplies the attached question.
pub fn screen_presumptives<S: AsRef<str>>(
    matches: &[PresumptiveMatch],
    yes_answers: &[S],
) -> Vec<PresumptiveSuggestion> {
    let selected: Vec<(&str, &str)> = PRESUMPTIVE_SYMPTOM_QUESTIONS
        .iter()
        .filter(|(id, _)| yes_answers.iter().any(|a| a.as_ref().eq_ignore_ascii_case(id)))
        .copied()
        .collect();

    matches
        .iter()
        .filter_map(|m| {
            let lower = m.condition.to_lowercase();
            selected
                .iter()
                .find(|(id, _)| lower.contains(id))
                .map(|(_, question)| PresumptiveSuggestion {
                    name: m.condition.clone(),
                    act: m.category_label.clone(),
                    user_symptom: Some((*question).to_string()),
                })
        })
        .collect()
}

/// One suggestion group per disability whose name matches a known primary.
pub fn secondary_suggestions(disabilities: &[Disability]) -> Vec<SecondarySuggestion> {
    disabilities
        .iter()
        .filter_map(|d| {
            let (_, list) = secondaries_for(&d.name)?;
            Some(SecondarySuggestion {
                primary_condition_name: d.name.clone(),
                suggested_secondaries: list
                    .iter()
                    .map(|s| SuggestedCondition {
                        name: s.name.to_string(),
                        chance: s.chance,
                    })
                    .collect(),
            })
        })
        .collect()
}

fn service_matches(entry: Option<NaiveDate>, release: Option<NaiveDate>) -> Vec<PresumptiveMatch> {
    match (entry, release) {
        (Some(entry), Some(release)) => matching_categories(entry, release, presumptive_categories()),
        _ => Vec::new(),
    }
}

/// Presumptive and secondary suggestions for a profile.
///
/// Needs at least one disability and both service dates entered.
pub fn new_claim_suggestions(profile: &UserProfile) -> Result<NewClaimSuggestions, StrategyError> {
    if profile.disabilities.is_empty() {
        return Err(StrategyError::NoDisabilities);
    }
    if !profile.service_dates.is_complete() {
        return Err(StrategyError::MissingServiceDates);
    }

    let dates = &profile.service_dates;
    let matches = service_matches(dates.entry(), dates.release());
    let presumptive_conditions = screen_presumptives(&matches, &profile.presumptive_yes_answers());
    let secondary_conditions = secondary_suggestions(&profile.disabilities);

    debug!(
        matches = matches.len(),
        presumptive = presumptive_conditions.len(),
        secondary = secondary_conditions.len(),
        "Built claim suggestions"
    );

    Ok(NewClaimSuggestions {
        presumptive_conditions,
        secondary_conditions,
    })
}

/// Replace the profile's strategy with fresh suggestions and the given
/// increase plans.
pub fn refresh_strategy(
    profile: &mut UserProfile,
    potential_increases: Vec<IncreaseStrategy>,
) -> Result<(), StrategyError> {
    let potential_new_claims = new_claim_suggestions(profile)?;
    profile.strategy_data = StrategyData {
        potential_increases,
        potential_new_claims,
    };
    Ok(())
}
