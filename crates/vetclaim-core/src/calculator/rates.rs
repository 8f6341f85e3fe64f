//! Monthly compensation rate tables (effective December 1, 2024).
//!
//! All amounts are in cents. Dependent add-ons only exist from 30% upward,
//! so the 10% and 20% tiers carry the veteran-alone rate only.

use super::compensation::DependentKey;
use super::money::Money;

use DependentKey::{
    Alone, Child, ChildParent, Parent, Spouse, SpouseChild, SpouseChildParent, SpouseParent,
};

type Tier = (u8, &'static [(DependentKey, i64)]);

const BASE_RATES: &[Tier] = &[
    (10, &[(Alone, 17551)]),
    (20, &[(Alone, 34695)]),
    (
        30,
        &[
            (Alone, 53742),
            (Spouse, 60142),
            (Child, 57942),
            (SpouseChild, 64842),
            (Parent, 58842),
            (SpouseParent, 65242),
            (ChildParent, 63042),
            (SpouseChildParent, 69942),
        ],
    ),
    (
        40,
        &[
            (Alone, 77416),
            (Spouse, 85916),
            (Child, 83116),
            (SpouseChild, 92216),
            (Parent, 84216),
            (SpouseParent, 92716),
            (ChildParent, 89916),
            (SpouseChildParent, 99016),
        ],
    ),
    (
        50,
        &[
            (Alone, 110204),
            (Spouse, 120804),
            (Child, 117304),
            (SpouseChild, 128704),
            (Parent, 118704),
            (SpouseParent, 129304),
            (ChildParent, 125804),
            (SpouseChildParent, 137204),
        ],
    ),
    (
        60,
        &[
            (Alone, 139593),
            (Spouse, 152393),
            (Child, 148093),
            (SpouseChild, 161793),
            (Parent, 149793),
            (SpouseParent, 162593),
            (ChildParent, 158293),
            (SpouseChildParent, 171993),
        ],
    ),
    (
        70,
        &[
            (Alone, 175919),
            (Spouse, 190819),
            (Child, 185819),
            (SpouseChild, 201819),
            (Parent, 187919),
            (SpouseParent, 202819),
            (ChildParent, 197819),
            (SpouseChildParent, 213819),
        ],
    ),
    (
        80,
        &[
            (Alone, 204489),
            (Spouse, 221489),
            (Child, 215889),
            (SpouseChild, 234089),
            (Parent, 218189),
            (SpouseParent, 235189),
            (ChildParent, 229589),
            (SpouseChildParent, 247789),
        ],
    ),
    (
        90,
        &[
            (Alone, 229796),
            (Spouse, 248996),
            (Child, 242596),
            (SpouseChild, 263096),
            (Parent, 245196),
            (SpouseParent, 264396),
            (ChildParent, 257996),
            (SpouseChildParent, 278496),
        ],
    ),
    (
        100,
        &[
            (Alone, 383130),
            (Spouse, 404491),
            (Child, 397415),
            (SpouseChild, 420135),
            (Parent, 400274),
            (SpouseParent, 421635),
            (ChildParent, 414559),
            (SpouseChildParent, 437279),
        ],
    ),
];

/// Each child under 18 beyond the one included in the base rate.
const CHILD_UNDER_18_EACH_ADDITIONAL: &[(u8, i64)] = &[
    (30, 3100),
    (40, 4200),
    (50, 5300),
    (60, 6300),
    (70, 7400),
    (80, 8400),
    (90, 9500),
    (100, 10614),
];

/// Each child 18-23 attending school.
const CHILD_OVER_18_SCHOOL_EACH: &[(u8, i64)] = &[
    (30, 10200),
    (40, 13700),
    (50, 17100),
    (60, 20500),
    (70, 23900),
    (80, 27400),
    (90, 30800),
    (100, 34285),
];

/// Each dependent parent beyond the one included in the base rate.
const PARENT_EACH_ADDITIONAL: &[(u8, i64)] = &[
    (30, 5100),
    (40, 6800),
    (50, 8500),
    (60, 10200),
    (70, 12000),
    (80, 13700),
    (90, 15400),
    (100, 17144),
];

/// Spouse receiving aid and attendance.
const SPOUSE_AID_ATTENDANCE: &[(u8, i64)] = &[
    (30, 5800),
    (40, 7800),
    (50, 9800),
    (60, 11700),
    (70, 13700),
    (80, 15700),
    (90, 17600),
    (100, 19592),
];

/// Flat amount per SMC-K award.
pub const SMC_K_PER_AWARD: Money = Money::from_cents(13606);

fn lookup(table: &[(u8, i64)], rating: u8) -> Option<Money> {
    table
        .iter()
        .find(|(tier, _)| *tier == rating)
        .map(|(_, cents)| Money::from_cents(*cents))
}

/// Base rate for a tier and dependent composition, if the table has it.
pub fn base_rate(rating: u8, key: DependentKey) -> Option<Money> {
    BASE_RATES
        .iter()
        .find(|(tier, _)| *tier == rating)
        .and_then(|(_, row)| row.iter().find(|(k, _)| *k == key))
        .map(|(_, cents)| Money::from_cents(*cents))
}

pub fn child_under_18_additional(rating: u8) -> Option<Money> {
    lookup(CHILD_UNDER_18_EACH_ADDITIONAL, rating)
}

pub fn child_over_18_school(rating: u8) -> Option<Money> {
    lookup(CHILD_OVER_18_SCHOOL_EACH, rating)
}

pub fn parent_additional(rating: u8) -> Option<Money> {
    lookup(PARENT_EACH_ADDITIONAL, rating)
}

pub fn spouse_aid_attendance(rating: u8) -> Option<Money> {
    lookup(SPOUSE_AID_ATTENDANCE, rating)
}

/// Rating tiers present in the base table, ascending.
pub fn tiers() -> impl Iterator<Item = u8> {
    BASE_RATES.iter().map(|(tier, _)| *tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tier_has_alone_rate() {
        for tier in tiers() {
            assert!(base_rate(tier, Alone).is_some(), "tier {tier} lacks alone rate");
        }
        assert_eq!(tiers().collect::<Vec<_>>(), vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_dependent_keys_start_at_thirty() {
        assert!(base_rate(20, Spouse).is_none());
        for tier in tiers().filter(|t| *t >= 30) {
            for key in DependentKey::ALL {
                assert!(base_rate(tier, key).is_some(), "tier {tier} lacks {key:?}");
            }
        }
    }

    #[test]
    fn test_base_rates_increase_with_rating() {
        let alone: Vec<Money> = tiers().filter_map(|t| base_rate(t, Alone)).collect();
        assert!(alone.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parent_step_matches_base_table() {
        // spouse_child1_parent1 is spouse_child1 plus one parent at every tier
        for tier in tiers().filter(|t| *t >= 30) {
            let with_parent = base_rate(tier, SpouseChildParent).map(Money::cents);
            let without = base_rate(tier, SpouseChild).map(Money::cents);
            let step = base_rate(tier, Parent).zip(base_rate(tier, Alone))
                .map(|(p, a)| p.cents() - a.cents());
            assert_eq!(with_parent, without.zip(step).map(|(w, s)| w + s), "tier {tier}");
        }
    }

    #[test]
    fn test_increment_tables_miss_below_thirty() {
        assert!(child_under_18_additional(20).is_none());
        assert!(child_over_18_school(10).is_none());
        assert!(parent_additional(20).is_none());
        assert!(spouse_aid_attendance(20).is_none());
        assert_eq!(spouse_aid_attendance(100), Some(Money::from_cents(19592)));
    }
}
