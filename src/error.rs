//! Error handling for broker export conversion.
//!
//! Provides error types with context for configuration problems, export
//! format mismatches, field parsing failures and workbook writing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in file: {path} - {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("File {path} is not valid {encoding}")]
    Encoding { path: PathBuf, encoding: String },

    #[error(
        "Input CSV is not in the expected format. Either this tool needs adaptation or \
         a wrong type of CSV was downloaded. {section} header is incorrect"
    )]
    HeaderMismatch { section: String },

    #[error("Invalid number '{value}'")]
    InvalidNumber { value: String },

    #[error("Invalid date '{value}' (expected format {format})")]
    InvalidDate {
        value: String,
        format: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("Withholding tax dated {date} has no preceding dividend to back-fill")]
    OrphanWithholdingTax { date: chrono::NaiveDate },

    #[error("Failed to process line {line} of {path}: {source}")]
    RowFailed {
        path: PathBuf,
        line: u64,
        #[source]
        source: Box<ConverterError>,
    },
}

impl ConverterError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a header mismatch error for the named export section
    pub fn header_mismatch(section: impl Into<String>) -> Self {
        Self::HeaderMismatch {
            section: section.into(),
        }
    }

    /// Attach the originating file and line to an error raised while handling a row
    pub fn in_row(self, path: impl Into<PathBuf>, line: u64) -> Self {
        match self {
            // Header problems describe the whole export, not one row
            Self::HeaderMismatch { .. } => self,
            other => Self::RowFailed {
                path: path.into(),
                line,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
