//! Application configuration management.
//!
//! Configuration is stored at `~/.config/vetclaim/config.json` (or the
//! platform equivalent). API secrets are never written there; they are
//! resolved from the environment or the OS keychain into `Secrets`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{DEFAULT_MODEL, DEFAULT_RETURN_URL};
use crate::auth::{CredentialStore, SecretKind};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "vetclaim";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Profile used when a command does not name one.
    pub last_user: Option<String>,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub gemini_model: Option<String>,
    pub billing_return_url: Option<String>,
    /// Seal new profile writes with a passphrase.
    #[serde(default)]
    pub seal_profiles: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Ok(serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn billing_return_url(&self) -> &str {
        self.billing_return_url.as_deref().unwrap_or(DEFAULT_RETURN_URL)
    }
}

/// API credentials, resolved once at startup and handed to the clients.
#[derive(Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub stripe_secret_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |s: &Option<String>| if s.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .field("stripe_secret_key", &mask(&self.stripe_secret_key))
            .finish()
    }
}

impl Secrets {
    /// Environment first, then the OS keychain.
    pub fn resolve() -> Self {
        Self::resolve_with(|var| std::env::var(var).ok(), |kind| CredentialStore::get(kind).ok())
    }

    pub fn resolve_with(
        env: impl Fn(&str) -> Option<String>,
        keychain: impl Fn(SecretKind) -> Option<String>,
    ) -> Self {
        let lookup = |kind: SecretKind| {
            let from_env = env(kind.env_var()).filter(|v| !v.trim().is_empty());
            let value = from_env.or_else(|| keychain(kind).filter(|v| !v.trim().is_empty()));
            debug!(secret = kind.account(), found = value.is_some(), "Resolved secret");
            value
        };
        Self {
            gemini_api_key: lookup(SecretKind::GeminiApiKey),
            stripe_secret_key: lookup(SecretKind::StripeSecretKey),
        }
    }

    pub fn get(&self, kind: SecretKind) -> Option<&str> {
        match kind {
            SecretKind::GeminiApiKey => self.gemini_api_key.as_deref(),
            SecretKind::StripeSecretKey => self.stripe_secret_key.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse");
        assert!(!config.seal_profiles);
        assert_eq!(config.gemini_model(), DEFAULT_MODEL);
        assert_eq!(config.billing_return_url(), DEFAULT_RETURN_URL);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/vetclaim-test")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().expect("dir"), PathBuf::from("/tmp/vetclaim-test"));
    }

    #[test]
    fn test_env_takes_precedence_over_keychain() {
        let secrets = Secrets::resolve_with(
            |var| (var == "GEMINI_API_KEY").then(|| "from-env".to_string()),
            |_| Some("from-keychain".to_string()),
        );
        assert_eq!(secrets.get(SecretKind::GeminiApiKey), Some("from-env"));
        assert_eq!(secrets.get(SecretKind::StripeSecretKey), Some("from-keychain"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let secrets = Secrets::resolve_with(|_| Some(" ".to_string()), |_| None);
        assert!(secrets.gemini_api_key.is_none());
        assert!(format!("{:?}", secrets).contains("<unset>"));
    }
}
