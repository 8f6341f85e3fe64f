//! Local persistence for profile documents.

pub mod crypto;
pub mod manager;

pub use crypto::SealError;
pub use manager::{ProfileStore, StoredProfile};
