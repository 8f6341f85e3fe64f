use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "vetclaim";

/// Third-party credentials the assistant can keep in the OS keychain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    GeminiApiKey,
    StripeSecretKey,
}

impl SecretKind {
    pub const ALL: [SecretKind; 2] = [SecretKind::GeminiApiKey, SecretKind::StripeSecretKey];

    /// Keychain account name.
    pub fn account(&self) -> &'static str {
        match self {
            SecretKind::GeminiApiKey => "gemini-api-key",
            SecretKind::StripeSecretKey => "stripe-secret-key",
        }
    }

    /// Environment variable that overrides the keychain.
    pub fn env_var(&self) -> &'static str {
        match self {
            SecretKind::GeminiApiKey => "GEMINI_API_KEY",
            SecretKind::StripeSecretKey => "STRIPE_SECRET_KEY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "gemini-api-key" => Some(SecretKind::GeminiApiKey),
            "stripe" | "stripe-secret-key" => Some(SecretKind::StripeSecretKey),
            _ => None,
        }
    }
}

pub struct CredentialStore;

impl CredentialStore {
    /// Store a secret in the OS keychain
    pub fn store(kind: SecretKind, secret: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.account())
            .context("Failed to create keyring entry")?;
        entry
            .set_password(secret)
            .context("Failed to store secret in keychain")?;
        Ok(())
    }

    /// Retrieve a secret from the OS keychain
    pub fn get(kind: SecretKind) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, kind.account())
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve secret from keychain")
    }

    pub fn delete(kind: SecretKind) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.account())
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete secret from keychain")?;
        Ok(())
    }

    pub fn has(kind: SecretKind) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, kind.account()) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_kind_names() {
        for kind in SecretKind::ALL {
            assert_eq!(SecretKind::parse(kind.account()), Some(kind));
        }
        assert_eq!(SecretKind::parse("Gemini"), Some(SecretKind::GeminiApiKey));
        assert_eq!(SecretKind::parse("openai"), None);
        assert_eq!(SecretKind::StripeSecretKey.env_var(), "STRIPE_SECRET_KEY");
    }
}
