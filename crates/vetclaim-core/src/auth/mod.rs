//! Credential storage for third-party API keys.
//!
//! Keys live in the OS keychain via `keyring`; environment variables take
//! precedence when resolving (see `config::Secrets`).

pub mod credentials;

pub use credentials::{CredentialStore, SecretKind};
