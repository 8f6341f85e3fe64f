//! Prompts sent to the generative model and parsing of what comes back.
//!
//! Kept free of I/O so the wire format can be tested on fixtures.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::knowledge::TemplateId;
use crate::models::{ClaimNotes, Disability, IncreaseStrategy, RatingCriterion, SymptomLog};

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

impl<'a> GenerateRequest<'a> {
    /// A single user turn. `json` asks the model for `application/json` output.
    pub fn user_prompt(prompt: &'a str, json: bool) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: json.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn into_text(self) -> Result<String, ApiError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::EmptyCompletion)
    }
}

/// Parse model output as JSON, tolerating a surrounding markdown code fence.
pub fn parse_json_text<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim()).context("Model returned invalid JSON")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncreasesEnvelope {
    #[serde(default)]
    pub potential_increases: Vec<IncreaseStrategy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaEnvelope {
    #[serde(default)]
    pub rating_strategies: Vec<RatingCriterion>,
}

// ============================================================================
// Prompts
// ============================================================================

pub fn extraction_prompt(document_text: &str) -> String {
    format!(
        "From the VA document text below, extract every service-connected disability with its \
         rating, the Entry on Duty date (EOD), and the Release from Active Duty date (RAD). \
         Respond with a single valid JSON object of the form \
         {{ \"disabilities\": [{{\"name\": \"tinnitus\", \"rating\": 10}}], \
         \"entryOnDutyDate\": \"YYYY-MM-DD\", \"releaseFromActiveDutyDate\": \"YYYY-MM-DD\" }}. \
         If no disabilities are found, use an empty array for \"disabilities\". \
         If a date is not found, use null for that key. Text: {}",
        document_text
    )
}

#[derive(Serialize)]
struct RatedCondition<'a> {
    name: &'a str,
    rating: u8,
}

pub fn increase_prompt(disabilities: &[Disability]) -> String {
    let list: Vec<RatedCondition<'_>> = disabilities
        .iter()
        .map(|d| RatedCondition {
            name: &d.name,
            rating: d.rating,
        })
        .collect();
    let list_json = serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an expert assistant for VA disability claims. For each disability in this list: {}, \
         give a detailed strategy for a rating increase. Respond with a single valid JSON object \
         with one key, \"potentialIncreases\": an array of objects with the keys \"name\", \
         \"currentRating\", \"nextRating\", \"criteriaForNextRating\", \"howToIncrease\" and \
         \"actionSteps\" (an object with \"crucialEvidence\", \"documentation\" and \"statements\"). \
         If a condition is already at its maximum rating, say so in \"howToIncrease\", set \
         \"nextRating\" to the current rating and make every \"actionSteps\" value null.",
        list_json
    )
}

pub fn criteria_prompt(condition: &str) -> String {
    format!(
        "For a veteran with \"{}\", give the official VA criteria for every possible rating \
         percentage. Respond with a single valid JSON object with one key, \"ratingStrategies\": \
         an array of objects with the keys \"rating\" (a string like \"30%\"), \"criteria\", \
         \"howToIncrease\" and \"actionSteps\" (an object with the string properties \
         \"crucialEvidence\", \"highLevelDocumentation\" and \"statements\"). \
         Do not include any text outside the JSON object.",
        condition
    )
}

pub fn secondary_details_prompt(primary: &str, secondary: &str) -> String {
    format!(
        "You are an expert assistant for VA disability claims. A veteran has a primary condition \
         of \"{}\" and is claiming \"{}\" as a secondary condition. Respond with a single valid \
         JSON object with four keys: \"whatItIs\" (one sentence explaining the secondary \
         condition), \"howItsConnected\" (one sentence on how it is medically linked to the \
         primary condition), \"whatToDo\" (an array of 3 short actionable steps) and \
         \"howToFile\" (one sentence on filing, mentioning VA Form 21-526EZ). \
         Do not include any text outside the JSON object.",
        primary, secondary
    )
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn symptom_summary(condition: &str, logs: &[SymptomLog]) -> String {
    if logs.is_empty() {
        return format!("The user has not logged specific symptoms for {} yet.", condition);
    }
    let entries: Vec<String> = logs
        .iter()
        .map(|l| {
            format!(
                "{}: Severity {}/10, Impact: {}, Notes: {}",
                l.date,
                l.severity,
                or_na(&l.impact),
                or_na(&l.notes)
            )
        })
        .collect();
    format!(
        "The user has logged the following symptoms for {}: {}",
        condition,
        entries.join("; ")
    )
}

fn notes_summary(notes: &ClaimNotes) -> String {
    format!(
        "The user has written the following notes for this claim: In-service event: {}. \
         Current symptoms: {}. Work impact: {}. Personal life impact: {}.",
        or_na(&notes.in_service_event),
        or_na(&notes.symptoms),
        or_na(&notes.work_impact),
        or_na(&notes.personal_impact)
    )
}

/// Prompt for a plain-text claim document prefilled from the veteran's logs and notes.
pub fn document_prompt(
    condition: &str,
    template: TemplateId,
    logs: &[SymptomLog],
    notes: &ClaimNotes,
) -> String {
    format!(
        "You are an expert assistant writing VA claim support documents. Write a professional, \
         well-structured document for a veteran claiming \"{}\". Prefill it with the personal \
         details below to produce a near-complete draft. Symptom data: {} Claim notes: {} \
         Use placeholders such as [Veteran's Name] or [Date] only for information not provided. \
         Do not use any markdown formatting; write headings in all caps \
         (for example 'I. VETERAN IDENTIFICATION'). {}",
        condition,
        symptom_summary(condition, logs),
        notes_summary(notes),
        template.template().instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(GenerateRequest::user_prompt("hello", true)).expect("serialize");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let plain = serde_json::to_value(GenerateRequest::user_prompt("hello", false)).expect("serialize");
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_text() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":1}"}]},"finishReason":"STOP"}]}"#,
        )
        .expect("parse");
        assert_eq!(resp.into_text().expect("text"), "{\"a\":1}");
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).expect("parse");
        assert!(matches!(resp.into_text(), Err(ApiError::EmptyCompletion)));
        let resp: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).expect("parse");
        assert!(matches!(resp.into_text(), Err(ApiError::EmptyCompletion)));
    }

    #[test]
    fn test_parse_json_text_strips_fences() {
        #[derive(Deserialize)]
        struct A {
            a: i32,
        }
        let a: A = parse_json_text("```json\n{\"a\": 2}\n```").expect("fenced");
        assert_eq!(a.a, 2);
        let a: A = parse_json_text(" {\"a\": 3} ").expect("bare");
        assert_eq!(a.a, 3);
        assert!(parse_json_text::<A>("not json").is_err());
    }

    #[test]
    fn test_increases_envelope() {
        let env: IncreasesEnvelope = parse_json_text(
            r#"{"potentialIncreases":[{"name":"PTSD","currentRating":"50%","nextRating":"70%",
                "criteriaForNextRating":"Deficiencies in most areas",
                "howToIncrease":"Document occupational impairment",
                "actionSteps":{"crucialEvidence":"Therapy notes","documentation":"DBQ","statements":"Spouse statement"}}]}"#,
        )
        .expect("parse");
        assert_eq!(env.potential_increases.len(), 1);
        assert_eq!(env.potential_increases[0].next_rating, "70%");

        let empty: IncreasesEnvelope = parse_json_text("{}").expect("parse");
        assert!(empty.potential_increases.is_empty());
    }

    #[test]
    fn test_increase_prompt_lists_disabilities() {
        let prompt = increase_prompt(&[Disability::new(1, "Tinnitus", 10)]);
        assert!(prompt.contains(r#"[{"name":"Tinnitus","rating":10}]"#));
        assert!(prompt.contains("potentialIncreases"));
    }

    #[test]
    fn test_document_prompt_includes_logs_and_notes() {
        let mut log = SymptomLog::new("2024-04-01", 8);
        log.notes = "Prostrating headache".into();
        let notes = ClaimNotes {
            in_service_event: "IED blast 2006".into(),
            ..Default::default()
        };
        let prompt = document_prompt("Migraines", TemplateId::Nexus, &[log], &notes);
        assert!(prompt.contains("2024-04-01: Severity 8/10, Impact: N/A, Notes: Prostrating headache"));
        assert!(prompt.contains("In-service event: IED blast 2006."));
        assert!(prompt.contains("Work impact: N/A."));
        assert!(prompt.ends_with(TemplateId::Nexus.template().instruction));
    }

    #[test]
    fn test_document_prompt_without_logs() {
        let prompt = document_prompt("Tinnitus", TemplateId::Personal, &[], &ClaimNotes::default());
        assert!(prompt.contains("has not logged specific symptoms for Tinnitus yet"));
    }
}
