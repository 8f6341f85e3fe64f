//! Stripe billing portal sessions.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::http::{build_client, send_with_backoff};
use super::ApiError;

const API_BASE_URL: &str = "https://api.stripe.com/v1";

pub const DEFAULT_RETURN_URL: &str = "https://vetclaim.app/account";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// Billing provider client. The secret key is supplied by the caller.
#[derive(Clone)]
pub struct BillingClient {
    client: Client,
    secret_key: String,
    base_url: String,
    default_return_url: String,
}

impl BillingClient {
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey("Stripe").into());
        }
        Ok(Self {
            client: build_client()?,
            secret_key,
            base_url: API_BASE_URL.to_string(),
            default_return_url: DEFAULT_RETURN_URL.to_string(),
        })
    }

    pub fn with_default_return_url(mut self, url: impl Into<String>) -> Self {
        self.default_return_url = url.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn resolve_return_url<'a>(&'a self, return_url: Option<&'a str>) -> &'a str {
        return_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.default_return_url)
    }

    /// Open a self-service portal session for a customer.
    ///
    /// An empty customer id is rejected before any request is made.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: Option<&str>,
    ) -> Result<PortalSession> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::MissingCustomer.into());
        }
        let url = format!("{}/billing_portal/sessions", self.base_url);
        let form = [
            ("customer", customer_id),
            ("return_url", self.resolve_return_url(return_url)),
        ];

        let response = send_with_backoff("billing portal", || {
            self.client
                .post(&url)
                .bearer_auth(&self.secret_key)
                .form(&form)
        })
        .await?;

        let session: PortalSession = response
            .json()
            .await
            .context("Failed to parse billing portal session")?;
        info!(session = %session.id, "Created billing portal session");
        Ok(session)
    }
}
