//! Data models for the stored profile document.
//!
//! This module contains the records a veteran's profile is made of:
//!
//! - `Disability`, `DependentProfile`, `ServiceDates`: calculator inputs
//! - `ClaimItem`, `ClaimStatus`, `SavedDocument`: the claim package
//! - `SymptomLog`, `Appointment`, `Todo`: trackers
//! - `StrategyData` and the suggestion types: generated claim strategy
//! - `ExtractedClaimData`: disabilities and dates read from a VA letter
//! - `UserProfile`: the whole document

pub mod claim;
pub mod dependents;
pub mod disability;
pub mod extraction;
pub mod lenient;
pub mod profile;
pub mod service;
pub mod strategy;
pub mod tracker;

pub use claim::{ClaimItem, ClaimNotes, ClaimStatus, ClaimType, NoteField, SavedDocument};
pub use dependents::{DependentProfile, MaritalStatus};
pub use disability::Disability;
pub use extraction::{ExtractedClaimData, ExtractedDisability, ExtractionOutcome};
pub use profile::{SessionInfo, UserProfile};
pub use service::{parse_iso_date, ServiceDates};
pub use strategy::{
    ActionSteps, IncreaseStrategy, NewClaimSuggestions, PresumptiveSuggestion, RatingCriterion,
    SecondaryDetails, SecondarySuggestion, StrategyData, SuggestedCondition,
};
pub use tracker::{symptom_logs_csv, Appointment, SymptomLog, Todo, SYMPTOM_CSV_HEADER};
