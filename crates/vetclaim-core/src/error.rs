use thiserror::Error;

/// Preconditions for building claim suggestions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Please add at least one disability.")]
    NoDisabilities,

    #[error("Please enter your service dates first.")]
    MissingServiceDates,
}

/// Rejected edits to a stored profile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("No disability with id {0}")]
    DisabilityNotFound(i64),

    #[error("'{0}' is not in the claim package")]
    ClaimNotFound(String),

    #[error("No symptom log with id {0}")]
    SymptomLogNotFound(i64),

    #[error("No appointment with id {0}")]
    AppointmentNotFound(i64),

    #[error("No to-do with id {0}")]
    TodoNotFound(i64),

    #[error("No saved document with id {0}")]
    DocumentNotFound(i64),

    #[error("A symptom log needs a date and notes")]
    IncompleteSymptomLog,

    #[error("'{0}' requires a Pro membership")]
    ProRequired(String),

    #[error("The {template} template is only available for secondary claims")]
    TemplateNotApplicable { template: String },
}
