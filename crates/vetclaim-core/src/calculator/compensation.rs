//! Monthly compensation lookup from a rounded combined rating and the
//! veteran's dependents.

use serde::{Deserialize, Serialize};

use super::money::Money;
use super::rates;
use crate::models::DependentProfile;

/// Ratings at or above this tier receive dependent add-ons.
pub const DEPENDENT_THRESHOLD: u8 = 30;

/// Column of the base rate table selected by the dependent composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum DependentKey {
    #[serde(rename = "alone")]
    Alone,
    #[serde(rename = "spouse")]
    Spouse,
    #[serde(rename = "child1")]
    Child,
    #[serde(rename = "parent1")]
    Parent,
    #[serde(rename = "spouse_child1")]
    SpouseChild,
    #[serde(rename = "spouse_parent1")]
    SpouseParent,
    #[serde(rename = "child1_parent1")]
    ChildParent,
    #[serde(rename = "spouse_child1_parent1")]
    SpouseChildParent,
}

impl DependentKey {
    pub const ALL: [DependentKey; 8] = [
        DependentKey::Alone,
        DependentKey::Spouse,
        DependentKey::Child,
        DependentKey::Parent,
        DependentKey::SpouseChild,
        DependentKey::SpouseParent,
        DependentKey::ChildParent,
        DependentKey::SpouseChildParent,
    ];

    pub fn from_flags(spouse: bool, child: bool, parent: bool) -> Self {
        match (spouse, child, parent) {
            (true, true, true) => DependentKey::SpouseChildParent,
            (true, true, false) => DependentKey::SpouseChild,
            (true, false, true) => DependentKey::SpouseParent,
            (false, true, true) => DependentKey::ChildParent,
            (true, false, false) => DependentKey::Spouse,
            (false, true, false) => DependentKey::Child,
            (false, false, true) => DependentKey::Parent,
            (false, false, false) => DependentKey::Alone,
        }
    }

    /// Table key name, e.g. `spouse_child1_parent1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependentKey::Alone => "alone",
            DependentKey::Spouse => "spouse",
            DependentKey::Child => "child1",
            DependentKey::Parent => "parent1",
            DependentKey::SpouseChild => "spouse_child1",
            DependentKey::SpouseParent => "spouse_parent1",
            DependentKey::ChildParent => "child1_parent1",
            DependentKey::SpouseChildParent => "spouse_child1_parent1",
        }
    }

    pub fn includes_child(&self) -> bool {
        matches!(
            self,
            DependentKey::Child
                | DependentKey::SpouseChild
                | DependentKey::ChildParent
                | DependentKey::SpouseChildParent
        )
    }

    pub fn includes_parent(&self) -> bool {
        matches!(
            self,
            DependentKey::Parent
                | DependentKey::SpouseParent
                | DependentKey::ChildParent
                | DependentKey::SpouseChildParent
        )
    }
}

/// Select the base-table column. Below 30% the answer is always `alone`.
pub fn dependent_key(rounded: u8, dependents: &DependentProfile) -> DependentKey {
    if rounded < DEPENDENT_THRESHOLD {
        return DependentKey::Alone;
    }
    DependentKey::from_flags(
        dependents.has_spouse(),
        dependents.children_under_18 > 0,
        dependents.dependent_parents > 0,
    )
}

/// Itemised monthly compensation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationBreakdown {
    pub rating: u8,
    pub key: Option<DependentKey>,
    pub base: Money,
    pub additional_children: Money,
    pub school_children: Money,
    pub additional_parents: Money,
    pub smc_k: Money,
    pub spouse_aid_attendance: Money,
    pub total: Money,
}

/// Compute the itemised monthly amount for a rounded combined rating.
///
/// Missing table entries contribute zero; the function never fails.
pub fn compensation_breakdown(rounded: u8, dependents: &DependentProfile) -> CompensationBreakdown {
    if rounded < 10 {
        return CompensationBreakdown {
            rating: rounded,
            ..Default::default()
        };
    }

    let key = dependent_key(rounded, dependents);
    let base = rates::base_rate(rounded, key)
        .or_else(|| rates::base_rate(rounded, DependentKey::Alone))
        .unwrap_or(Money::ZERO);

    let extra_children = dependents
        .children_under_18
        .saturating_sub(u32::from(key.includes_child()));
    let additional_children =
        rates::child_under_18_additional(rounded).unwrap_or(Money::ZERO) * extra_children;

    // School-age children are always counted in full
    let school_children = rates::child_over_18_school(rounded).unwrap_or(Money::ZERO)
        * dependents.children_over_18_school;

    let extra_parents = dependents
        .dependent_parents
        .saturating_sub(u32::from(key.includes_parent()));
    let additional_parents =
        rates::parent_additional(rounded).unwrap_or(Money::ZERO) * extra_parents;

    let (smc_k, spouse_aid_attendance) = if rounded >= DEPENDENT_THRESHOLD {
        let smc_k = rates::SMC_K_PER_AWARD * dependents.smc_k_awards;
        let aid = if dependents.has_spouse() && dependents.spouse_aid_attendance {
            rates::spouse_aid_attendance(rounded).unwrap_or(Money::ZERO)
        } else {
            Money::ZERO
        };
        (smc_k, aid)
    } else {
        (Money::ZERO, Money::ZERO)
    };

    let total = base
        + additional_children
        + school_children
        + additional_parents
        + smc_k
        + spouse_aid_attendance;

    CompensationBreakdown {
        rating: rounded,
        key: Some(key),
        base,
        additional_children,
        school_children,
        additional_parents,
        smc_k,
        spouse_aid_attendance,
        total,
    }
}

/// Monthly compensation for a rounded combined rating.
pub fn compensate(rounded: u8, dependents: &DependentProfile) -> Money {
    compensation_breakdown(rounded, dependents).total
}
