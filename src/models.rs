//! Core data structures for broker export conversion.
//!
//! Defines the normalized records written to the output workbook, the
//! events a broker adapter extracts from raw rows, and conversion statistics.

use chrono::NaiveDate;
use std::path::PathBuf;

/// A buy or sell of an instrument
///
/// The side is encoded by the table the trade lands in, so `quantity` is
/// always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    /// ISIN or ticker
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    /// Fees in the trade's settlement currency
    pub fees: f64,
    pub currency: String,
    pub product: String,
}

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Buys carry a positive signed quantity, everything else is a sale
    pub fn from_signed_quantity(quantity: f64) -> Self {
        if quantity > 0.0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        }
    }
}

/// A dividend or interest payment
#[derive(Debug, Clone, PartialEq)]
pub struct Dividend {
    pub date: NaiveDate,
    pub symbol: String,
    pub amount: f64,
    /// Tax withheld, back-filled by a later withholding-tax row
    pub tax_withholding: f64,
    pub currency: String,
    pub product: String,
}

/// A currency exchange, or a deposit recorded as a same-currency exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ForexConversion {
    pub date: NaiveDate,
    /// Amount in the source currency, always positive
    pub foreign_amount: f64,
    pub source_fees: f64,
    pub source_currency: String,
    pub target_currency: String,
}

/// A restricted stock unit vest
#[derive(Debug, Clone, PartialEq)]
pub struct RsuVest {
    pub date: NaiveDate,
    pub symbol: String,
    pub amount: f64,
    pub gross_quantity: f64,
    pub net_quantity: f64,
    pub fair_market_value: f64,
    pub currency: String,
    pub product: String,
}

/// An employee stock purchase plan purchase
#[derive(Debug, Clone, PartialEq)]
pub struct EsppPurchase {
    pub date: NaiveDate,
    pub symbol: String,
    pub buy_price: f64,
    pub fair_market_value: f64,
    pub quantity: f64,
    pub currency: String,
    pub product: String,
}

/// One leg of a two-row currency exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ForexLeg {
    pub value_date: NaiveDate,
    pub currency: String,
    /// Signed amount: negative for the currency being sold
    pub amount: f64,
}

/// Ticker to ISIN mapping reported by a broker export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentInfo {
    pub ticker: String,
    pub isin: String,
}

/// Normalized outcome of one classified row
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerEvent {
    Trade { side: TradeSide, trade: Trade },
    ForexLeg(ForexLeg),
    Deposit(ForexConversion),
    Dividend(Dividend),
    /// Parsed (signed) withholding amount for the most recent dividend
    WithholdingTax { date: NaiveDate, amount: f64 },
    Interest(Dividend),
    InstrumentInfo(InstrumentInfo),
}

/// Declared input file of a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// WHATWG encoding label, e.g. `utf-8`
    pub encoding: String,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            encoding: encoding.into(),
        }
    }
}

/// Conversion statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub files_processed: usize,
    pub rows_read: usize,
    /// Buy and sell trades
    pub trades: usize,
    /// Dividends and interest payments
    pub dividends: usize,
    /// Completed currency exchanges and deposits
    pub forex: usize,
    /// Symbols replaced with ISINs
    pub instrument_substitutions: usize,
    pub processing_time_ms: u128,
}
