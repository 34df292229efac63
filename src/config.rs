//! Configuration management and validation.
//!
//! Holds the settings of one conversion run: which broker produced the
//! exports, where they live, where the workbook goes, and optional behaviour
//! toggles. Validation happens before any input row is read.

use crate::broker::Broker;
use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings of one conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Broker that produced the exports
    pub broker: Broker,

    /// Primary transactions export
    pub input_path: PathBuf,

    /// Auxiliary account-activity export (required for DEGIRO)
    pub auxiliary_path: Option<PathBuf>,

    /// Output XLSX workbook
    pub output_path: PathBuf,

    /// Replace ticker symbols with ISINs where the export provides a mapping
    pub replace_ticker_with_isin: bool,

    /// Show a spinner while reading input files
    pub show_progress: bool,
}

impl ConverterConfig {
    /// Create a configuration with default toggles
    pub fn new(broker: Broker, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            broker,
            input_path,
            auxiliary_path: None,
            output_path,
            replace_ticker_with_isin: false,
            show_progress: false,
        }
    }

    /// Set the auxiliary account-activity export
    pub fn with_auxiliary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.auxiliary_path = Some(path.into());
        self
    }

    /// Enable ticker to ISIN substitution
    pub fn with_ticker_replacement(mut self, enabled: bool) -> Self {
        self.replace_ticker_with_isin = enabled;
        self
    }

    /// Enable progress spinners
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Check that every configured file is usable
    pub fn validate(&self) -> Result<()> {
        if self.broker.requires_auxiliary_file() && self.auxiliary_path.is_none() {
            return Err(ConverterError::configuration(format!(
                "{} conversion requires the Account.csv export; specify it with --degiro-account-csv",
                self.broker
            )));
        }

        let inputs = std::iter::once(&self.input_path).chain(self.auxiliary_path.as_ref());
        for path in inputs {
            if !path.is_file() {
                return Err(ConverterError::InputNotFound { path: path.clone() });
            }
        }

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConverterError::configuration(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        debug!("Validated configuration: {:?}", self);
        Ok(())
    }
}
