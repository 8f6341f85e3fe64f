use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient::{
    deserialize_count, deserialize_optional_datetime, deserialize_optional_string,
    deserialize_rating, deserialize_record_id, deserialize_string_or_empty,
};
use crate::knowledge::TemplateId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ClaimType {
    #[default]
    Primary,
    Secondary,
    Presumptive,
}

impl ClaimType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "secondary" => ClaimType::Secondary,
            "presumptive" => ClaimType::Presumptive,
            _ => ClaimType::Primary,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimType::Primary => write!(f, "Primary"),
            ClaimType::Secondary => write!(f, "Secondary"),
            ClaimType::Presumptive => write!(f, "Presumptive"),
        }
    }
}

impl<'de> Deserialize<'de> for ClaimType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = deserialize_optional_string(deserializer)?;
        Ok(raw.as_deref().map(ClaimType::parse).unwrap_or_default())
    }
}

/// Where a claim stands with the VA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ClaimStatus {
    #[default]
    Tracking,
    Submitted,
    PendingReview,
    CpScheduled,
    CpCompleted,
    Denied,
    Approved,
    AppealInProgress,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 8] = [
        ClaimStatus::Tracking,
        ClaimStatus::Submitted,
        ClaimStatus::PendingReview,
        ClaimStatus::CpScheduled,
        ClaimStatus::CpCompleted,
        ClaimStatus::Denied,
        ClaimStatus::Approved,
        ClaimStatus::AppealInProgress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Tracking => "Tracking",
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::PendingReview => "Pending Review",
            ClaimStatus::CpScheduled => "C&P Scheduled",
            ClaimStatus::CpCompleted => "C&P Completed",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::AppealInProgress => "Appeal in Progress",
        }
    }

    /// Match a label ignoring case, spaces, `&` and dashes, so
    /// `"c&p scheduled"`, `"cp-scheduled"` and `"CpScheduled"` all work.
    pub fn parse(s: &str) -> Option<Self> {
        let norm = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = norm(s);
        Self::ALL.into_iter().find(|st| norm(st.label()) == wanted)
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, ClaimStatus::Denied | ClaimStatus::Approved)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ClaimStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ClaimStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = deserialize_optional_string(deserializer)?;
        Ok(raw.as_deref().and_then(ClaimStatus::parse).unwrap_or_default())
    }
}

/// Free-text notes attached to a claim, used to seed generated documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ClaimNotes {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub in_service_event: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub symptoms: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub work_impact: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub personal_impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    InServiceEvent,
    Symptoms,
    WorkImpact,
    PersonalImpact,
}

impl NoteField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "inserviceevent" | "event" => Some(NoteField::InServiceEvent),
            "symptoms" => Some(NoteField::Symptoms),
            "workimpact" | "work" => Some(NoteField::WorkImpact),
            "personalimpact" | "personal" => Some(NoteField::PersonalImpact),
            _ => None,
        }
    }
}

impl ClaimNotes {
    pub fn field_mut(&mut self, field: NoteField) -> &mut String {
        match field {
            NoteField::InServiceEvent => &mut self.in_service_event,
            NoteField::Symptoms => &mut self.symptoms,
            NoteField::WorkImpact => &mut self.work_impact,
            NoteField::PersonalImpact => &mut self.personal_impact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.in_service_event.is_empty()
            && self.symptoms.is_empty()
            && self.work_impact.is_empty()
            && self.personal_impact.is_empty()
    }
}

/// A condition the veteran is pursuing, keyed by name in the claim package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub claim_type: ClaimType,
    /// Primary condition a secondary claim hangs off.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<String>,
    /// Legal basis of a presumptive claim.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub act: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub chance: Option<String>,
    #[serde(default)]
    pub status: ClaimStatus,
    /// 0 until a decision assigns a percentage.
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub approved_rating: u8,
    #[serde(default)]
    pub notes: ClaimNotes,
}

impl ClaimItem {
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn secondary(name: impl Into<String>, primary: impl Into<String>, chance: Option<String>) -> Self {
        Self {
            name: name.into(),
            claim_type: ClaimType::Secondary,
            primary: Some(primary.into()),
            chance,
            ..Default::default()
        }
    }

    pub fn presumptive(name: impl Into<String>, act: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            claim_type: ClaimType::Presumptive,
            act: Some(act.into()),
            ..Default::default()
        }
    }
}

/// A generated document the veteran chose to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    #[serde(default, deserialize_with = "deserialize_record_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub condition_name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub template_id: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub template_title: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub version: u32,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedDocument {
    pub fn template(&self) -> Option<TemplateId> {
        TemplateId::parse(&self.template_id)
    }

    pub fn display_title(&self) -> String {
        format!("{} (v{})", self.template_title, self.version)
    }
}
