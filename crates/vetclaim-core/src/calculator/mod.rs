//! Disability rating and compensation calculator.
//!
//! Everything here is pure and synchronous:
//!
//! - `rating`: VA combined rating and rounding to the nearest ten
//! - `compensation`: monthly amount from rating tier and dependents
//! - `presumptive`: service-period overlap with exposure windows
//! - `assessment`: the three composed over a stored profile

pub mod assessment;
pub mod compensation;
pub mod money;
pub mod presumptive;
pub mod rates;
pub mod rating;

pub use assessment::{assess, Assessment};
pub use compensation::{
    compensate, compensation_breakdown, dependent_key, CompensationBreakdown, DependentKey,
};
pub use money::Money;
pub use presumptive::{
    is_eligible, matching_categories, merge_by_condition, MergedPresumptive, PresumptiveMatch,
    ServiceDateRange,
};
pub use rating::{combine, combine_disabilities, combined_rating, round_to_ten, CombinedRating};
