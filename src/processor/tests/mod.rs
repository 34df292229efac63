//! Integration tests for the conversion driver
//!
//! Tests the complete pipeline against small DEGIRO exports written to
//! temporary directories.


use crate::broker::Broker;
use crate::config::ConverterConfig;
use crate::constants::degiro::{ACCOUNT_HEADER, TRANSACTIONS_HEADER};
use std::fs;
use tempfile::TempDir;

/// Buy of 10 APPLE at 170.50 USD with a 1 EUR fee
pub const APPLE_BUY: &str = "05-03-2024,09:04,APPLE INC,US0378331005,NDQ,XNAS,10,170.50,USD,-1705.00,USD,-1550.12,EUR,1.0998,-1.00,EUR,-1551.12,EUR,order-1";

/// Sale of 5 IWDA at 85.00 EUR with a 2 EUR fee
pub const IWDA_SELL: &str = "01-02-2024,15:30,ISHARES CORE MSCI WORLD,IE00B4L5Y983,XET,XETA,-5,85.00,EUR,425.00,EUR,425.00,EUR,,-2.00,EUR,423.00,EUR,order-2";

/// Wrapped product name of the previous row
pub const CONTINUATION: &str = ",,UCITS ETF,,,,,,,,,,,,,,,,";

pub const DEPOSIT: &str = "10-01-2024,09:00,10-01-2024,,,flatex Einzahlung,,EUR,\"1,000.00\",EUR,\"1,000.00\",";
pub const WITHDRAWAL: &str = "20-06-2024,10:00,20-06-2024,,,flatex Einzahlung,,EUR,-100.00,EUR,900.00,";
pub const FOREX_IN: &str = "05-03-2024,09:04,05-03-2024,APPLE INC,US0378331005,Währungswechsel (Einbuchung),1.0998,USD,1705.00,USD,1705.00,order-1";
pub const FOREX_OUT: &str = "05-03-2024,09:04,05-03-2024,APPLE INC,US0378331005,Währungswechsel (Ausbuchung),1.0998,EUR,-1550.12,EUR,-550.12,order-1";
pub const TRADE_CASH: &str = "05-03-2024,09:04,05-03-2024,APPLE INC,US0378331005,Kauf 10 zu je 170.5 USD,,USD,-1705.00,USD,0.00,order-1";
pub const DIVIDEND: &str = "16-05-2024,07:00,15-05-2024,APPLE INC,US0378331005,Dividende,,USD,2.40,USD,2.40,";
pub const WITHHOLDING: &str = "16-05-2024,07:00,15-05-2024,APPLE INC,US0378331005,Dividendensteuer,,USD,-0.36,USD,2.04,";
pub const ZERO_INTEREST: &str = "01-04-2024,00:00,31-03-2024,,,Flatex Interest Income,,EUR,0.00,EUR,-550.12,";
pub const INTEREST: &str = "01-05-2024,00:00,30-04-2024,,,Flatex Interest Income,,EUR,0.15,EUR,-549.97,";

/// Write both exports, each preceded by its header, and return a matching configuration
pub fn write_exports(
    temp_dir: &TempDir,
    transaction_rows: &[&str],
    account_rows: &[&str],
) -> ConverterConfig {
    let mut transactions = vec![TRANSACTIONS_HEADER.join(",")];
    transactions.extend(transaction_rows.iter().map(|row| row.to_string()));
    let mut account = vec![ACCOUNT_HEADER.join(",")];
    account.extend(account_rows.iter().map(|row| row.to_string()));

    write_raw_exports(temp_dir, &transactions.join("\n"), &account.join("\n"))
}

/// Write both exports verbatim and return a matching configuration
pub fn write_raw_exports(temp_dir: &TempDir, transactions: &str, account: &str) -> ConverterConfig {
    let transactions_path = temp_dir.path().join("Transactions.csv");
    let account_path = temp_dir.path().join("Account.csv");
    fs::write(&transactions_path, transactions).unwrap();
    fs::write(&account_path, account).unwrap();

    ConverterConfig::new(
        Broker::Degiro,
        transactions_path,
        temp_dir.path().join("portfolio.xlsx"),
    )
    .with_auxiliary_path(account_path)
}
