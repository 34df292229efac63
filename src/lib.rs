//! Broker Converter Library
//!
//! Converts broker transaction exports into a normalized workbook of buy
//! orders, dividends, sell orders, currency conversions, RSU vests and ESPP
//! purchases, ready for tax and portfolio tooling.
//!
//! This library provides tools for:
//! - Decoding and reading broker CSV exports
//! - Classifying raw rows and extracting normalized records per broker
//! - Pairing two-row currency exchanges and back-filling withholding taxes
//! - Writing the sorted tables to a multi-sheet XLSX workbook

pub mod broker;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parsing;
pub mod processor;
pub mod tables;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod logging;
}

// Re-export commonly used types
pub use broker::Broker;
pub use config::ConverterConfig;
pub use error::{ConverterError, Result};
pub use models::ConversionStats;
pub use processor::{ConversionOutcome, Converter};
pub use tables::ConversionTables;
