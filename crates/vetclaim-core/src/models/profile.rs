//! The per-user profile document and the edits the front end makes to it.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::claim::{ClaimItem, ClaimStatus, NoteField, SavedDocument};
use super::dependents::DependentProfile;
use super::disability::Disability;
use super::lenient::{
    deserialize_optional_datetime, deserialize_optional_string, deserialize_string_or_empty,
};
use super::service::ServiceDates;
use super::strategy::StrategyData;
use super::tracker::{symptom_logs_csv, Appointment, SymptomLog, Todo};
use crate::error::ProfileError;
use crate::knowledge::TemplateId;
use crate::membership::MembershipStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// `"eod|rad"` of the service dates the presumptive prompt was last shown for.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub shown_presumptive_modal_for: Option<String>,
}

/// Smallest id at or after `start` that is not in `used`, wrapping to the
/// bottom of the range if the top is full.
fn first_unused(start: i64, used: &HashSet<i64>) -> i64 {
    (start..=i64::MAX)
        .chain(i64::MIN..start)
        .find(|id| !used.contains(id))
        .unwrap_or(start)
}

/// Everything stored for one veteran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    #[serde(default)]
    pub membership_status: MembershipStatus,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub stripe_customer_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub stripe_subscription_id: Option<String>,
    #[serde(default)]
    pub disabilities: Vec<Disability>,
    #[serde(default)]
    pub dependents: DependentProfile,
    #[serde(default)]
    pub service_dates: ServiceDates,
    #[serde(default)]
    pub strategy_data: StrategyData,
    #[serde(default)]
    pub claim_package: Vec<ClaimItem>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    /// Keyed by condition name.
    #[serde(default)]
    pub symptom_logs: BTreeMap<String, Vec<SymptomLog>>,
    /// Screening answers keyed by symptom id.
    #[serde(default)]
    pub presumptive_symptoms: BTreeMap<String, bool>,
    #[serde(default)]
    pub saved_documents: Vec<SavedDocument>,
    #[serde(default)]
    pub session_info: SessionInfo,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            created_at: Some(now),
            updated_at: Some(now),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        let fallback = if self.username.is_empty() {
            self.id.as_str()
        } else {
            self.username.as_str()
        };
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    fn record_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.disabilities
            .iter()
            .map(|d| d.id)
            .chain(self.appointments.iter().map(|a| a.id))
            .chain(self.todos.iter().map(|t| t.id))
            .chain(self.saved_documents.iter().map(|d| d.id))
            .chain(self.symptom_logs.values().flatten().map(|l| l.id))
    }

    fn record_ids_mut(&mut self) -> impl Iterator<Item = &mut i64> + '_ {
        self.disabilities
            .iter_mut()
            .map(|d| &mut d.id)
            .chain(self.appointments.iter_mut().map(|a| &mut a.id))
            .chain(self.todos.iter_mut().map(|t| &mut t.id))
            .chain(self.saved_documents.iter_mut().map(|d| &mut d.id))
            .chain(self.symptom_logs.values_mut().flatten().map(|l| &mut l.id))
    }

    /// Millisecond timestamp, bumped past every id already in the document.
    ///
    /// When the largest id is already `i64::MAX` the first free id from now
    /// on is used instead.
    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.record_ids().max().unwrap_or(0).checked_add(1) {
            Some(after) => now.max(after),
            None => {
                let used: HashSet<i64> = self.record_ids().collect();
                first_unused(now, &used)
            }
        }
    }

    /// Give every record an id no other record shares.
    ///
    /// Older documents stored fractional ids which lose their fraction on
    /// load, so records created in the same millisecond collide. The first
    /// record keeps the id and later ones get fresh ids. Returns how many
    /// ids changed.
    pub fn dedupe_record_ids(&mut self) -> usize {
        let mut used: HashSet<i64> = HashSet::new();
        let mut duplicates = Vec::new();
        for id in self.record_ids_mut() {
            if !used.insert(*id) {
                duplicates.push(id);
            }
        }
        let start = Utc::now().timestamp_millis();
        let count = duplicates.len();
        for id in duplicates {
            let fresh = first_unused(start, &used);
            used.insert(fresh);
            *id = fresh;
        }
        count
    }

    // ===== Disabilities =====

    pub fn add_disability(&mut self, name: &str, rating: u8) -> Result<i64, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let id = self.next_id();
        self.disabilities.push(Disability::new(id, name, rating));
        debug!(id, name, rating, "Added disability");
        Ok(id)
    }

    fn disability_mut(&mut self, id: i64) -> Result<&mut Disability, ProfileError> {
        self.disabilities
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ProfileError::DisabilityNotFound(id))
    }

    pub fn rename_disability(&mut self, id: i64, name: &str) -> Result<(), ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        self.disability_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn rate_disability(&mut self, id: i64, rating: u8) -> Result<(), ProfileError> {
        self.disability_mut(id)?.rating = rating.min(100);
        Ok(())
    }

    pub fn remove_disability(&mut self, id: i64) -> Result<Disability, ProfileError> {
        let idx = self
            .disabilities
            .iter()
            .position(|d| d.id == id)
            .ok_or(ProfileError::DisabilityNotFound(id))?;
        Ok(self.disabilities.remove(idx))
    }

    // ===== Household and service =====

    pub fn set_dependents(&mut self, dependents: DependentProfile) {
        self.dependents = dependents;
    }

    pub fn set_service_dates(&mut self, dates: ServiceDates) {
        self.service_dates = dates;
    }

    /// Clear everything derived from the current disability list.
    pub fn reset_claim_data(&mut self) {
        self.disabilities.clear();
        self.strategy_data = StrategyData::default();
        self.claim_package.clear();
        self.symptom_logs.clear();
        self.presumptive_symptoms.clear();
        debug!(user = %self.id, "Reset claim data");
    }

    // ===== Claim package =====

    pub fn claim(&self, name: &str) -> Option<&ClaimItem> {
        self.claim_package.iter().find(|c| c.name == name)
    }

    fn claim_mut(&mut self, name: &str) -> Result<&mut ClaimItem, ProfileError> {
        self.claim_package
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ProfileError::ClaimNotFound(name.to_string()))
    }

    /// Returns false when a claim of that name is already in the package.
    pub fn add_claim(&mut self, item: ClaimItem) -> Result<bool, ProfileError> {
        if item.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.claim(&item.name).is_some() {
            return Ok(false);
        }
        self.claim_package.push(item);
        Ok(true)
    }

    pub fn remove_claim(&mut self, name: &str) -> Result<ClaimItem, ProfileError> {
        let idx = self
            .claim_package
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ProfileError::ClaimNotFound(name.to_string()))?;
        Ok(self.claim_package.remove(idx))
    }

    pub fn set_claim_status(&mut self, name: &str, status: ClaimStatus) -> Result<(), ProfileError> {
        self.claim_mut(name)?.status = status;
        Ok(())
    }

    pub fn set_approved_rating(&mut self, name: &str, rating: u8) -> Result<(), ProfileError> {
        self.claim_mut(name)?.approved_rating = rating.min(100);
        Ok(())
    }

    pub fn set_claim_note(&mut self, name: &str, field: NoteField, text: &str) -> Result<(), ProfileError> {
        *self.claim_mut(name)?.notes.field_mut(field) = text.to_string();
        Ok(())
    }

    // ===== Symptom logs =====

    pub fn symptom_logs_for(&self, condition: &str) -> &[SymptomLog] {
        self.symptom_logs
            .get(condition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add_symptom_log(&mut self, condition: &str, mut log: SymptomLog) -> Result<i64, ProfileError> {
        if condition.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if log.date.trim().is_empty() || log.notes.trim().is_empty() {
            return Err(ProfileError::IncompleteSymptomLog);
        }
        log.id = self.next_id();
        let id = log.id;
        self.symptom_logs
            .entry(condition.to_string())
            .or_default()
            .push(log);
        Ok(id)
    }

    pub fn remove_symptom_log(&mut self, condition: &str, id: i64) -> Result<SymptomLog, ProfileError> {
        let logs = self
            .symptom_logs
            .get_mut(condition)
            .ok_or(ProfileError::SymptomLogNotFound(id))?;
        let idx = logs
            .iter()
            .position(|l| l.id == id)
            .ok_or(ProfileError::SymptomLogNotFound(id))?;
        Ok(logs.remove(idx))
    }

    pub fn symptom_csv(&self, condition: &str) -> String {
        symptom_logs_csv(self.symptom_logs_for(condition))
    }

    // ===== Appointments =====

    pub fn add_appointment(&mut self, mut appointment: Appointment) -> i64 {
        appointment.id = self.next_id();
        let id = appointment.id;
        self.appointments.push(appointment);
        id
    }

    /// Replace the appointment with the same id.
    pub fn update_appointment(&mut self, appointment: Appointment) -> Result<(), ProfileError> {
        let slot = self
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or(ProfileError::AppointmentNotFound(appointment.id))?;
        *slot = appointment;
        Ok(())
    }

    pub fn remove_appointment(&mut self, id: i64) -> Result<Appointment, ProfileError> {
        let idx = self
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(ProfileError::AppointmentNotFound(id))?;
        Ok(self.appointments.remove(idx))
    }

    pub fn upcoming_appointments(&self) -> Vec<&Appointment> {
        let mut sorted: Vec<&Appointment> = self.appointments.iter().collect();
        sorted.sort_by(|a, b| a.when().cmp(&b.when()));
        sorted
    }

    // ===== To-dos =====

    pub fn add_todo(&mut self, text: &str, due_date: Option<String>) -> Result<i64, ProfileError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let id = self.next_id();
        self.todos.push(Todo {
            id,
            text: text.to_string(),
            completed: false,
            due_date: due_date.filter(|d| !d.trim().is_empty()),
        });
        Ok(id)
    }

    /// Flip completion and return the new state.
    pub fn toggle_todo(&mut self, id: i64) -> Result<bool, ProfileError> {
        let todo = self
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ProfileError::TodoNotFound(id))?;
        todo.completed = !todo.completed;
        Ok(todo.completed)
    }

    pub fn remove_todo(&mut self, id: i64) -> Result<Todo, ProfileError> {
        let idx = self
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(ProfileError::TodoNotFound(id))?;
        Ok(self.todos.remove(idx))
    }

    // ===== Saved documents =====

    /// Store a generated document. Versions count up per condition and template.
    pub fn save_document(&mut self, condition: &str, template: TemplateId, content: &str) -> &SavedDocument {
        let existing = self
            .saved_documents
            .iter()
            .filter(|d| d.condition_name == condition && d.template_id == template.as_str())
            .count();
        let doc = SavedDocument {
            id: self.next_id(),
            condition_name: condition.to_string(),
            template_id: template.as_str().to_string(),
            template_title: template.title().to_string(),
            content: content.to_string(),
            version: existing as u32 + 1,
            created_at: Some(Utc::now()),
        };
        self.saved_documents.push(doc);
        let last = self.saved_documents.len() - 1;
        &self.saved_documents[last]
    }

    pub fn edit_document(&mut self, id: i64, content: &str) -> Result<(), ProfileError> {
        let doc = self
            .saved_documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(ProfileError::DocumentNotFound(id))?;
        doc.content = content.to_string();
        Ok(())
    }

    pub fn delete_document(&mut self, id: i64) -> Result<SavedDocument, ProfileError> {
        let idx = self
            .saved_documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(ProfileError::DocumentNotFound(id))?;
        Ok(self.saved_documents.remove(idx))
    }

    pub fn documents_for(&self, condition: &str) -> Vec<&SavedDocument> {
        self.saved_documents
            .iter()
            .filter(|d| d.condition_name == condition)
            .collect()
    }

    // ===== Presumptive screening =====

    pub fn set_presumptive_answer(&mut self, symptom_id: &str, yes: bool) {
        self.presumptive_symptoms.insert(symptom_id.to_string(), yes);
    }

    /// Symptom ids answered yes.
    pub fn presumptive_yes_answers(&self) -> Vec<&str> {
        self.presumptive_symptoms
            .iter()
            .filter(|(_, yes)| **yes)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn presumptive_prompt_shown(&self) -> bool {
        self.session_info.shown_presumptive_modal_for.as_deref()
            == Some(self.service_dates.prompt_key().as_str())
    }

    pub fn mark_presumptive_prompt_shown(&mut self) {
        self.session_info.shown_presumptive_modal_for = Some(self.service_dates.prompt_key());
    }
}
