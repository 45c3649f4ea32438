//! Export formats and the files they produce.

use chrono::NaiveDate;

use crate::error::ParseError;
use crate::util::month_bounds;

/// Schedule export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// `.xlsx` workbook.
    Excel,
    Pdf,
}

impl ExportFormat {
    /// Path segment under `/api/export/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Pdf => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" | "spreadsheet" => Ok(Self::Excel),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ParseError::ExportFormat(s.to_string())),
        }
    }
}

/// Date range and archival switch for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_archived: bool,
}

impl ExportRange {
    /// The calendar month containing `today`, archived projects excluded.
    pub fn current_month(today: NaiveDate) -> Self {
        let (start, end) = month_bounds(today);
        Self {
            start,
            end,
            include_archived: false,
        }
    }

    /// Default file name, `schedule_{start}_{end}.{ext}`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("schedule_{}_{}.{}", self.start, self.end, extension)
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.start.to_string()),
            ("end", self.end.to_string()),
            ("includeArchived", self.include_archived.to_string()),
        ]
    }
}

/// A rendered export ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
