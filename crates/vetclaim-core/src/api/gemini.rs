//! Client for the Gemini `generateContent` endpoint.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::http::{build_client, send_with_backoff};
use super::prompts::{self, CriteriaEnvelope, GenerateRequest, GenerateResponse, IncreasesEnvelope};
use super::ApiError;
use crate::error::ProfileError;
use crate::knowledge::TemplateId;
use crate::models::{
    Disability, ExtractedClaimData, IncreaseStrategy, RatingCriterion, SecondaryDetails, UserProfile,
};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Generative model client. The API key is supplied by the caller.
#[derive(Clone)]
pub struct GenerativeClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GenerativeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey("Gemini").into());
        }
        Ok(Self {
            client: build_client()?,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different host, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the model's text.
    pub async fn generate(&self, prompt: &str, json: bool) -> Result<String> {
        let url = self.endpoint();
        let body = GenerateRequest::user_prompt(prompt, json);
        debug!(model = %self.model, json, prompt_len = prompt.len(), "Sending generation request");

        let response = send_with_backoff("generateContent", || {
            self.client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
        })
        .await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generateContent response")?;
        Ok(parsed.into_text()?)
    }

    async fn generate_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
        let text = self.generate(prompt, true).await?;
        prompts::parse_json_text(&text)
    }

    // ===== Operations =====

    /// Read disabilities and service dates out of a VA letter's text.
    pub async fn extract_claim_data(&self, document_text: &str) -> Result<ExtractedClaimData> {
        if document_text.trim().is_empty() {
            anyhow::bail!("No text content could be extracted from the file.");
        }
        let data: ExtractedClaimData = self
            .generate_json(&prompts::extraction_prompt(document_text))
            .await?;
        info!(disabilities = data.disabilities.len(), "Extracted claim data");
        Ok(data)
    }

    pub async fn increase_strategies(&self, disabilities: &[Disability]) -> Result<Vec<IncreaseStrategy>> {
        if disabilities.is_empty() {
            return Ok(Vec::new());
        }
        let envelope: IncreasesEnvelope = self
            .generate_json(&prompts::increase_prompt(disabilities))
            .await?;
        Ok(envelope.potential_increases)
    }

    /// Official criteria for each rating level of a condition.
    pub async fn rating_criteria(&self, condition: &str) -> Result<Vec<RatingCriterion>> {
        let envelope: CriteriaEnvelope = self.generate_json(&prompts::criteria_prompt(condition)).await?;
        Ok(envelope.rating_strategies)
    }

    pub async fn secondary_details(&self, primary: &str, secondary: &str) -> Result<SecondaryDetails> {
        self.generate_json(&prompts::secondary_details_prompt(primary, secondary))
            .await
    }

    /// Draft a plain-text document for a condition in the claim package.
    pub async fn draft_document(
        &self,
        profile: &UserProfile,
        condition: &str,
        template: TemplateId,
    ) -> Result<String> {
        let claim = profile
            .claim(condition)
            .ok_or_else(|| ProfileError::ClaimNotFound(condition.to_string()))?;
        let prompt = prompts::document_prompt(
            condition,
            template,
            profile.symptom_logs_for(condition),
            &claim.notes,
        );
        self.generate(&prompt, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        let err = GenerativeClient::new("  ").err().expect("blank key rejected");
        assert!(err.to_string().contains("Gemini API key is not configured"));
    }

    #[test]
    fn test_endpoint() {
        let client = GenerativeClient::new("k")
            .expect("client")
            .with_model("gemini-test")
            .with_base_url("http://localhost:9999/v1beta");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }
}
