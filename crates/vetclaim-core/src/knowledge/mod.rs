//! Bundled reference data.
//!
//! This module contains the static knowledge the assistant reasons over:
//!
//! - Presumptive exposure categories and their service windows
//! - Secondary conditions suggested for common primary disabilities
//! - Presumptive symptom screening questions
//! - Claim support document templates

pub mod presumptive;
pub mod secondary;
pub mod symptoms;
pub mod templates;

pub use presumptive::{category, presumptive_categories, ExposureWindow, PresumptiveCategory};
pub use secondary::{secondaries_for, Chance, SecondaryCondition, SECONDARY_CONDITIONS};
pub use symptoms::{logging_tip, question_for, PRESUMPTIVE_SYMPTOM_QUESTIONS};
pub use templates::{DocumentTemplate, TemplateId, DOCUMENT_TEMPLATES};
