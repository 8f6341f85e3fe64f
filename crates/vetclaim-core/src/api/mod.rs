//! HTTP clients for the third-party services the assistant relies on.
//!
//! - `GenerativeClient`: Gemini text generation for document extraction,
//!   rating strategies and claim document drafts
//! - `BillingClient`: Stripe billing portal sessions
//!
//! Credentials are passed in by the caller; nothing here reads the
//! environment.

pub mod billing;
pub mod error;
pub mod gemini;
mod http;
pub mod prompts;

pub use billing::{BillingClient, PortalSession, DEFAULT_RETURN_URL};
pub use error::ApiError;
pub use gemini::{GenerativeClient, DEFAULT_MODEL};
