//! Command-line argument definitions for the broker converter
//!
//! Defines the CLI using the clap derive API and turns parsed arguments into
//! a [`ConverterConfig`].

use crate::broker::Broker;
use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the broker export converter
///
/// Converts a broker's CSV exports into one XLSX workbook with buy orders,
/// dividends, sell orders, currency conversions, RSU and ESPP sheets.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "broker-converter",
    version,
    about = "Convert broker transaction exports into a normalized XLSX workbook",
    long_about = "Reads the CSV exports of a broker (currently DEGIRO) and writes a workbook \
                  with one sheet per record type: buy_orders, dividends, sell_orders, \
                  currency_conversions, rsu and espp. Rows are sorted by date."
)]
pub struct Args {
    /// Broker that produced the exports
    #[arg(value_enum, value_name = "BROKER")]
    pub broker: Broker,

    /// Primary transactions export
    ///
    /// For DEGIRO this is the `Transactions.csv` download.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Transactions CSV export"
    )]
    pub input_path: PathBuf,

    /// Output workbook, replaced if it already exists
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output XLSX workbook"
    )]
    pub output_path: PathBuf,

    /// DEGIRO account-activity export
    ///
    /// Deposits, currency exchanges, dividends, withholding taxes and
    /// interest are read from this file.
    #[arg(
        long = "degiro-account-csv",
        value_name = "FILE",
        help = "DEGIRO Account.csv export (required for degiro)"
    )]
    pub degiro_account_csv: Option<PathBuf>,

    /// Replace ticker symbols with ISINs where the export maps them
    #[arg(
        long = "ticker-to-isin",
        help = "Replace ticker symbols with ISINs where the export provides a mapping"
    )]
    pub ticker_to_isin: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.broker.requires_auxiliary_file() && self.degiro_account_csv.is_none() {
            return Err(ConverterError::configuration(format!(
                "{} conversion requires --degiro-account-csv",
                self.broker
            )));
        }

        if self.degiro_account_csv.as_ref() == Some(&self.input_path) {
            return Err(ConverterError::configuration(
                "Transactions and account exports must be different files",
            ));
        }

        if self.output_path.extension().is_none_or(|ext| ext != "xlsx") {
            return Err(ConverterError::configuration(format!(
                "Output file must have an .xlsx extension: {}",
                self.output_path.display()
            )));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the run configuration
    pub fn to_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new(
            self.broker,
            self.input_path.clone(),
            self.output_path.clone(),
        )
        .with_ticker_replacement(self.ticker_to_isin)
        .with_progress(self.show_progress());

        if let Some(account) = &self.degiro_account_csv {
            config = config.with_auxiliary_path(account);
        }
        config
    }
}
