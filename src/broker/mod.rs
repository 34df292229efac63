//! Broker adapters
//!
//! Each supported broker provides a [`BrokerAdapter`] that knows the layout of
//! its exports: which files to read, how to classify a raw row and how to turn
//! a classified row into a normalized [`BrokerEvent`].

pub mod degiro;

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::models::{BrokerEvent, InputFile};
use clap::ValueEnum;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use degiro::DegiroAdapter;

/// Supported brokers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Broker {
    /// DEGIRO `Transactions.csv` plus `Account.csv`
    Degiro,
}

impl Broker {
    /// Whether the broker needs an auxiliary account-activity export
    pub fn requires_auxiliary_file(&self) -> bool {
        match self {
            Broker::Degiro => true,
        }
    }

    /// Whether the exports map ticker symbols to ISINs
    pub fn supports_ticker_replacement(&self) -> bool {
        match self {
            Broker::Degiro => false,
        }
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Broker::Degiro => write!(f, "DEGIRO"),
        }
    }
}

/// Category of a raw export row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCategory {
    /// A validated header row
    Header,
    Trade,
    Forex,
    Deposit,
    Dividend,
    WithholdingTax,
    Interest,
    InstrumentInfo,
    /// Rows carrying nothing to convert
    Ignored,
}

/// Export layout of one broker
pub trait BrokerAdapter {
    fn broker(&self) -> Broker;

    /// Input files in processing order; the first one has file index 1
    fn input_files(&self) -> Vec<InputFile>;

    /// Classify a row of the file with the given 1-based index
    ///
    /// Header rows are validated here and fail with
    /// [`ConverterError::HeaderMismatch`] when they deviate from the layout.
    fn classify(&self, row: &StringRecord, file_index: usize) -> Result<RowCategory>;

    /// Extract the normalized event of a classified row, if it carries one
    fn extract(&self, category: RowCategory, row: &StringRecord) -> Result<Option<BrokerEvent>>;
}

/// Build the adapter for the configured broker
pub fn adapter_for(config: &ConverterConfig) -> Result<Box<dyn BrokerAdapter>> {
    match config.broker {
        Broker::Degiro => {
            let account_path = config.auxiliary_path.clone().ok_or_else(|| {
                ConverterError::configuration(
                    "Specify the Account.csv file with --degiro-account-csv",
                )
            })?;
            Ok(Box::new(DegiroAdapter::new(
                config.input_path.clone(),
                account_path,
            )))
        }
    }
}

/// Positional field of a raw row; absent trailing columns read as empty
pub(crate) fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

/// Whether a row equals the expected header exactly
pub(crate) fn matches_header(row: &StringRecord, expected: &[&str]) -> bool {
    row.len() == expected.len() && row.iter().zip(expected).all(|(actual, wanted)| actual == *wanted)
}
