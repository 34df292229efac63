//! Conversion driver.
//!
//! Reads the broker's input files in order, classifies every row, applies
//! the extracted events to the output tables and finally sorts the tables
//! by date before handing them to the XLSX writer.

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::reader::{read_records, record_line};
use self::writer::XlsxWriter;

use crate::broker::{BrokerAdapter, adapter_for};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::models::{BrokerEvent, ConversionStats};
use crate::tables::ConversionTables;

use colored::*;
use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sorted tables and counters of a finished conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub tables: ConversionTables,
    pub stats: ConversionStats,
}

/// Main driver for converting one broker's exports
pub struct Converter {
    config: ConverterConfig,
    adapter: Box<dyn BrokerAdapter>,
}

impl Converter {
    /// Validate the configuration and select the broker adapter
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let adapter = adapter_for(&config)?;
        Ok(Self { config, adapter })
    }

    /// Use a specific adapter instead of the configured broker's
    pub fn with_adapter(config: ConverterConfig, adapter: Box<dyn BrokerAdapter>) -> Self {
        Self { config, adapter }
    }

    /// Read and convert every input file without writing output
    pub fn process(&self) -> Result<ConversionOutcome> {
        let start_time = Instant::now();
        let mut tables = ConversionTables::new();
        let mut stats = ConversionStats::default();

        if self.config.replace_ticker_with_isin && !self.adapter.broker().supports_ticker_replacement() {
            warn!(
                "{} exports carry no ticker to ISIN mapping; --ticker-to-isin has no effect",
                self.adapter.broker()
            );
        }

        for (index, input) in self.adapter.input_files().iter().enumerate() {
            let file_index = index + 1;
            info!("Reading file {}: {}", file_index, input.path.display());

            let records = read_records(input)?;
            let progress_bar = self.progress_bar(records.len(), &input.path.display().to_string());

            for record in &records {
                self.process_row(record, file_index, &mut tables, &mut stats)
                    .map_err(|error| error.in_row(&input.path, record_line(record)))?;
                stats.rows_read += 1;
                progress_bar.inc(1);
            }

            progress_bar.finish_and_clear();
            stats.files_processed += 1;
        }

        tables.discard_pending_forex();
        tables.sort_by_date();
        stats.processing_time_ms = start_time.elapsed().as_millis();

        info!("Total processed trades: {}", stats.trades);
        info!("Total processed dividends: {}", stats.dividends);
        info!("Total processed Forex trades: {}", stats.forex);
        info!("Replaced symbols: {}", stats.instrument_substitutions);

        Ok(ConversionOutcome { tables, stats })
    }

    /// Convert the inputs and write the workbook
    pub fn convert(&self) -> Result<ConversionStats> {
        let outcome = self.process()?;

        let writer = XlsxWriter::new(self.config.output_path.clone());
        writer.write(&outcome.tables)?;

        print_summary(&outcome.stats, &writer);
        Ok(outcome.stats)
    }

    fn process_row(
        &self,
        record: &StringRecord,
        file_index: usize,
        tables: &mut ConversionTables,
        stats: &mut ConversionStats,
    ) -> Result<()> {
        let category = self.adapter.classify(record, file_index)?;
        if let Some(event) = self.adapter.extract(category, record)? {
            debug!("File {} {:?} row -> {:?}", file_index, category, event);
            apply_event(event, tables, stats, self.config.replace_ticker_with_isin)?;
        }
        Ok(())
    }

    fn progress_bar(&self, rows: usize, label: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(rows as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        progress_bar.set_style(style);
        progress_bar.set_message(label.to_string());
        progress_bar
    }
}

/// Apply one extracted event to the tables and counters
pub fn apply_event(
    event: BrokerEvent,
    tables: &mut ConversionTables,
    stats: &mut ConversionStats,
    replace_ticker_with_isin: bool,
) -> Result<()> {
    match event {
        BrokerEvent::Trade { side, trade } => {
            tables.push_trade(side, trade);
            stats.trades += 1;
        }
        BrokerEvent::ForexLeg(leg) => {
            if tables.apply_forex_leg(leg) {
                stats.forex += 1;
            }
        }
        BrokerEvent::Deposit(conversion) => {
            tables.push_conversion(conversion);
            stats.forex += 1;
        }
        BrokerEvent::Dividend(dividend) | BrokerEvent::Interest(dividend) => {
            tables.push_dividend(dividend);
            stats.dividends += 1;
        }
        BrokerEvent::WithholdingTax { date, amount } => {
            tables.backfill_withholding(date, -amount)?;
        }
        BrokerEvent::InstrumentInfo(info) => {
            if replace_ticker_with_isin {
                // Only rows already read can be rewritten
                stats.instrument_substitutions += tables.replace_symbol(&info.ticker, &info.isin);
            }
        }
    }
    Ok(())
}

fn print_summary(stats: &ConversionStats, writer: &XlsxWriter) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Total processed trades:".bright_cyan(),
        stats.trades.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Total processed dividends:".bright_cyan(),
        stats.dividends.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Total processed Forex trades:".bright_cyan(),
        stats.forex.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Replaced symbols:".bright_cyan(),
        stats.instrument_substitutions.to_string().bright_white()
    );
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );

    let file_name = writer
        .output_path()
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| writer.output_path().display().to_string());
    println!(
        "Results were written to '{}'",
        file_name.bright_white().bold()
    );
}
