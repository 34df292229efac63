//! Application constants for the broker converter
//!
//! This module contains output sheet names, default values and the fixed
//! labels that identify rows in each supported broker's exports.

// =============================================================================
// Output Workbook
// =============================================================================

/// Sheet holding buy trades
pub const SHEET_BUY_ORDERS: &str = "buy_orders";

/// Sheet holding dividends and interest payments
pub const SHEET_DIVIDENDS: &str = "dividends";

/// Sheet holding sell trades
pub const SHEET_SELL_ORDERS: &str = "sell_orders";

/// Sheet holding currency conversions and deposits
pub const SHEET_CURRENCY_CONVERSIONS: &str = "currency_conversions";

/// Sheet holding RSU vest events
pub const SHEET_RSU: &str = "rsu";

/// Sheet holding ESPP purchase events
pub const SHEET_ESPP: &str = "espp";

/// Excel number format applied to every floating point cell
pub const FLOAT_NUMBER_FORMAT: &str = "0.00";

/// Excel number format applied to date cells
pub const DATE_NUMBER_FORMAT: &str = "yyyy-mm-dd";

// =============================================================================
// Logging
// =============================================================================

/// Crate target used for the default tracing filter
pub const LOG_TARGET: &str = "broker_converter";

// =============================================================================
// DEGIRO Exports
// =============================================================================

/// Fixed labels and formats of the DEGIRO `Transactions.csv` and `Account.csv` exports
pub mod degiro {
    /// Encoding of both DEGIRO exports
    pub const ENCODING: &str = "utf-8";

    /// Date format used in every date column
    pub const DATE_FORMAT: &str = "%d-%m-%Y";

    /// Account base currency; fees in any other currency carry an exchange rate
    pub const BASE_CURRENCY: &str = "EUR";

    /// First-column values that mark a header row
    pub const HEADER_DATE_TOKENS: &[&str] = &["Datum", "Date"];

    /// Section name reported for a bad `Transactions.csv` header
    pub const TRANSACTIONS_SECTION: &str = "Transactions";

    /// Section name reported for a bad `Account.csv` header
    pub const ACCOUNT_SECTION: &str = "Account";

    /// Exact header row of `Transactions.csv`
    pub const TRANSACTIONS_HEADER: &[&str] = &[
        "Datum",
        "Uhrzeit",
        "Produkt",
        "ISIN",
        "Referenzbörse",
        "Ausführungsort",
        "Anzahl",
        "Kurs",
        "",
        "Wert in Lokalwährung",
        "",
        "Wert",
        "",
        "Wechselkurs",
        "Transaktionsgebühren",
        "",
        "Gesamt",
        "",
        "Order-ID",
    ];

    /// Exact header row of `Account.csv`
    pub const ACCOUNT_HEADER: &[&str] = &[
        "Datum",
        "Uhrzeit",
        "Valutadatum",
        "Produkt",
        "ISIN",
        "Beschreibung",
        "FX",
        "Änderung",
        "",
        "Saldo",
        "",
        "Order-Id",
    ];

    /// Description prefix of both legs of a currency exchange
    pub const FOREX_MARKER: &str = "Währungswechsel";

    /// Descriptions of incoming cash transfers
    pub const DEPOSIT_LABELS: &[&str] = &["flatex Einzahlung", "Einzahlung", "Interne Einzahlung"];

    /// Description of a dividend payment
    pub const DIVIDEND_LABEL: &str = "Dividende";

    /// Description of the withholding tax on the preceding dividend
    pub const WITHHOLDING_TAX_LABEL: &str = "Dividendensteuer";

    /// Description prefix of interest payments on cash balances
    pub const INTEREST_PREFIX: &str = "Flatex Interest";
}
