//! The calculator run over a whole profile.

use serde::{Deserialize, Serialize};

use super::compensation::{compensation_breakdown, CompensationBreakdown};
use super::money::Money;
use super::presumptive::is_eligible;
use super::rating::combine_disabilities;
use crate::knowledge::presumptive_categories;
use crate::models::UserProfile;

/// Combined rating, monthly compensation and presumptive status for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub raw_combined: f64,
    pub rounded_combined: u8,
    pub compensation: Money,
    pub breakdown: CompensationBreakdown,
    /// Service dates overlap at least one presumptive window.
    pub presumptive_eligible: bool,
    /// Eligible, and the screening prompt has not been shown for these dates.
    pub presumptive_prompt_due: bool,
}

pub fn assess(profile: &UserProfile) -> Assessment {
    let combined = combine_disabilities(&profile.disabilities);
    let breakdown = compensation_breakdown(combined.rounded, &profile.dependents);

    let presumptive_eligible = profile
        .service_dates
        .range()
        .is_some_and(|range| {
            is_eligible(
                range.entry_on_duty,
                range.release_from_active_duty,
                presumptive_categories(),
            )
        });

    Assessment {
        raw_combined: combined.raw,
        rounded_combined: combined.rounded,
        compensation: breakdown.total,
        breakdown,
        presumptive_eligible,
        presumptive_prompt_due: presumptive_eligible && !profile.presumptive_prompt_shown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaritalStatus, ServiceDates};

    #[test]
    fn test_empty_profile() {
        let a = assess(&UserProfile::default());
        assert_eq!(a.raw_combined, 0.0);
        assert_eq!(a.rounded_combined, 0);
        assert_eq!(a.compensation, Money::ZERO);
        assert!(!a.presumptive_eligible);
        assert!(!a.presumptive_prompt_due);
    }

    #[test]
    fn test_married_veteran_at_seventy() {
        let mut profile = UserProfile::default();
        profile.add_disability("PTSD", 50).expect("add");
        profile.add_disability("Back condition", 40).expect("add");
        profile.dependents.marital_status = MaritalStatus::Married;

        let a = assess(&profile);
        assert!((a.raw_combined - 70.0).abs() < 1e-9);
        assert_eq!(a.rounded_combined, 70);
        assert_eq!(a.compensation, a.breakdown.total);
        assert!(a.compensation > Money::from_cents(175919));
    }

    #[test]
    fn test_prompt_due_until_marked() {
        let mut profile = UserProfile::default();
        profile.set_service_dates(ServiceDates::new("1969-01-01", "1972-01-01"));
        let a = assess(&profile);
        assert!(a.presumptive_eligible);
        assert!(a.presumptive_prompt_due);

        profile.mark_presumptive_prompt_shown();
        let a = assess(&profile);
        assert!(a.presumptive_eligible);
        assert!(!a.presumptive_prompt_due);
    }

    #[test]
    fn test_invalid_dates_are_not_eligible() {
        let mut profile = UserProfile::default();
        profile.set_service_dates(ServiceDates::new("1972-01-01", "1969-01-01"));
        assert!(!assess(&profile).presumptive_eligible);
    }
}
