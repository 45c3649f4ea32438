use thiserror::Error;
use worksite_core::{ParseError, ValidationError};
use worksite_db::{OperationError, SchemaError};
use worksite_remote::RemoteError;

/// Errors surfaced by the store facade and its helpers.
#[derive(Debug, Error)]
pub enum WorksiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local store error: {0}")]
    Store(#[from] OperationError),

    #[error("Local store schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Invalid project: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("{0} is only available in local mode")]
    LocalOnly(&'static str),

    #[error("{0} needs a backend mode")]
    RemoteOnly(&'static str),
}

impl WorksiteError {
    /// Whether the error means the addressed project or media does not exist,
    /// in either the local store or the backend.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Store(OperationError::NotFound { .. }) => true,
            Self::Remote(e) => e.is_not_found(),
            _ => false,
        }
    }
}
