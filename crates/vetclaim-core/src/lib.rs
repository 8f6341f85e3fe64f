//! Core library for vetclaim: a VA disability claims assistant.
//!
//! - `calculator`: combined rating, monthly compensation, presumptive eligibility
//! - `knowledge`: bundled presumptive, secondary-condition and template data
//! - `models`: the stored profile document
//! - `strategy`, `membership`: claim suggestions and Pro gating
//! - `store`: local profile persistence, optionally sealed
//! - `api`, `auth`, `config`: third-party clients and their credentials

pub mod api;
pub mod auth;
pub mod calculator;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod membership;
pub mod models;
pub mod store;
pub mod strategy;
pub mod utils;

pub use calculator::{assess, combine, compensate, is_eligible, round_to_ten, Assessment, Money};
pub use config::{Config, Secrets};
pub use error::{ProfileError, StrategyError};
pub use membership::MembershipStatus;
pub use models::UserProfile;
pub use store::ProfileStore;
