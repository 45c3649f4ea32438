use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised when a draft or patch would produce an invalid project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are empty
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The end date lies before the start date
    #[error("end date {end} is before start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Errors raised when parsing user or wire input into domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown project status: '{0}'")]
    Status(String),

    #[error("unknown stage: '{0}'")]
    Stage(String),

    #[error("unknown field style: '{0}' (expected snake or camel)")]
    FieldStyle(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Date(String),

    #[error("invalid month '{0}' (expected YYYY-MM)")]
    Month(String),

    #[error("unknown export format: '{0}' (expected excel or pdf)")]
    ExportFormat(String),

    #[error("unknown API mode: '{0}' (expected local, backend-test, or backend-prod)")]
    Mode(String),
}
