//! DEGIRO export adapter
//!
//! DEGIRO conversions read two exports. `Transactions.csv` (file 1) lists
//! executed trades only. `Account.csv` (file 2) is the account journal: it
//! repeats the cash side of every trade (rows linked to an order id) and adds
//! currency exchanges, deposits, dividends, withholding tax and interest.

use super::{Broker, BrokerAdapter, RowCategory, field, matches_header};
use crate::constants::degiro::{
    ACCOUNT_HEADER, ACCOUNT_SECTION, BASE_CURRENCY, DATE_FORMAT, DEPOSIT_LABELS, DIVIDEND_LABEL,
    ENCODING, FOREX_MARKER, HEADER_DATE_TOKENS, INTEREST_PREFIX, TRANSACTIONS_HEADER,
    TRANSACTIONS_SECTION, WITHHOLDING_TAX_LABEL,
};
use crate::error::{ConverterError, Result};
use crate::models::{BrokerEvent, Dividend, ForexConversion, ForexLeg, InputFile, Trade, TradeSide};
use crate::parsing::{parse_amount, parse_date, parse_optional_amount};
use csv::StringRecord;
use std::path::PathBuf;
use tracing::trace;

const TRANSACTIONS_FILE: usize = 1;
const ACCOUNT_FILE: usize = 2;

/// Named view of a `Transactions.csv` row
#[derive(Debug, Clone, PartialEq)]
struct TransactionRow<'a> {
    date: &'a str,
    product: &'a str,
    isin: &'a str,
    quantity: &'a str,
    price: &'a str,
    currency: &'a str,
    exchange_rate: &'a str,
    fee: &'a str,
    fee_currency: &'a str,
}

impl<'a> TransactionRow<'a> {
    fn from_record(row: &'a StringRecord) -> Self {
        Self {
            date: field(row, 0),
            product: field(row, 2),
            isin: field(row, 3),
            quantity: field(row, 6),
            price: field(row, 7),
            currency: field(row, 8),
            exchange_rate: field(row, 13),
            fee: field(row, 14),
            fee_currency: field(row, 15),
        }
    }
}

/// Named view of an `Account.csv` row
#[derive(Debug, Clone, PartialEq)]
struct AccountRow<'a> {
    date: &'a str,
    value_date: &'a str,
    product: &'a str,
    isin: &'a str,
    description: &'a str,
    currency: &'a str,
    amount: &'a str,
    order_id: &'a str,
}

impl<'a> AccountRow<'a> {
    fn from_record(row: &'a StringRecord) -> Self {
        Self {
            date: field(row, 0),
            value_date: field(row, 2),
            product: field(row, 3),
            isin: field(row, 4),
            description: field(row, 5),
            currency: field(row, 7),
            amount: field(row, 8),
            order_id: field(row, 11),
        }
    }

    fn is_forex(&self) -> bool {
        self.description.starts_with(FOREX_MARKER)
    }

    /// Journal rows without a linked order (currency exchanges excepted) are the only ones
    /// not already covered by `Transactions.csv`
    fn is_skipped(&self) -> bool {
        self.date.is_empty()
            || self.currency.is_empty()
            || (!self.order_id.is_empty() && !self.is_forex())
    }

    fn value_date(&self) -> Result<chrono::NaiveDate> {
        parse_date(self.value_date, DATE_FORMAT)
    }
}

fn is_header(row: &StringRecord) -> bool {
    HEADER_DATE_TOKENS.contains(&field(row, 0))
}

/// Adapter for DEGIRO `Transactions.csv` and `Account.csv` exports
#[derive(Debug, Clone)]
pub struct DegiroAdapter {
    transactions_path: PathBuf,
    account_path: PathBuf,
}

impl DegiroAdapter {
    pub fn new(transactions_path: PathBuf, account_path: PathBuf) -> Self {
        Self {
            transactions_path,
            account_path,
        }
    }

    fn classify_transaction(&self, row: &StringRecord) -> Result<RowCategory> {
        if is_header(row) {
            if !matches_header(row, TRANSACTIONS_HEADER) {
                return Err(ConverterError::header_mismatch(TRANSACTIONS_SECTION));
            }
            return Ok(RowCategory::Header);
        }

        // Long product names wrap into a continuation row without a date
        if field(row, 0).is_empty() {
            return Ok(RowCategory::Ignored);
        }

        Ok(RowCategory::Trade)
    }

    fn classify_account(&self, row: &StringRecord) -> Result<RowCategory> {
        if is_header(row) {
            if !matches_header(row, ACCOUNT_HEADER) {
                return Err(ConverterError::header_mismatch(ACCOUNT_SECTION));
            }
            return Ok(RowCategory::Header);
        }

        let account = AccountRow::from_record(row);
        if account.is_skipped() {
            return Ok(RowCategory::Ignored);
        }

        let description = account.description;
        let category = if account.is_forex() {
            RowCategory::Forex
        } else if DEPOSIT_LABELS.contains(&description) {
            RowCategory::Deposit
        } else if description == DIVIDEND_LABEL {
            RowCategory::Dividend
        } else if description == WITHHOLDING_TAX_LABEL {
            RowCategory::WithholdingTax
        } else if description.starts_with(INTEREST_PREFIX) {
            RowCategory::Interest
        } else {
            RowCategory::Ignored
        };
        Ok(category)
    }

    fn extract_trade(&self, row: &StringRecord) -> Result<Option<BrokerEvent>> {
        let transaction = TransactionRow::from_record(row);
        if transaction.date.is_empty() {
            return Ok(None);
        }

        let quantity = parse_amount(transaction.quantity)?;
        let fee = if transaction.fee.is_empty() {
            0.0
        } else {
            -parse_amount(transaction.fee)?
        };
        let exchange_rate = parse_optional_amount(transaction.exchange_rate)?;
        let fees = if transaction.fee_currency == BASE_CURRENCY {
            fee
        } else {
            fee * exchange_rate
        };

        let trade = Trade {
            date: parse_date(transaction.date, DATE_FORMAT)?,
            symbol: transaction.isin.to_string(),
            quantity: quantity.abs(),
            price: parse_amount(transaction.price)?,
            fees,
            currency: transaction.currency.to_string(),
            product: transaction.product.to_string(),
        };

        Ok(Some(BrokerEvent::Trade {
            side: TradeSide::from_signed_quantity(quantity),
            trade,
        }))
    }

    fn extract_forex_leg(&self, account: &AccountRow<'_>) -> Result<Option<BrokerEvent>> {
        Ok(Some(BrokerEvent::ForexLeg(ForexLeg {
            value_date: account.value_date()?,
            currency: account.currency.to_string(),
            amount: parse_amount(account.amount)?,
        })))
    }

    fn extract_deposit(&self, account: &AccountRow<'_>) -> Result<Option<BrokerEvent>> {
        let amount = parse_amount(account.amount)?;
        // Withdrawals are not reported
        if amount <= 0.0 {
            return Ok(None);
        }

        Ok(Some(BrokerEvent::Deposit(ForexConversion {
            date: account.value_date()?,
            foreign_amount: amount,
            source_fees: 0.0,
            source_currency: account.currency.to_string(),
            target_currency: account.currency.to_string(),
        })))
    }

    fn extract_dividend(&self, account: &AccountRow<'_>) -> Result<Option<BrokerEvent>> {
        Ok(Some(BrokerEvent::Dividend(Dividend {
            date: account.value_date()?,
            symbol: account.isin.to_string(),
            amount: parse_amount(account.amount)?,
            tax_withholding: 0.0,
            currency: account.currency.to_string(),
            product: account.product.to_string(),
        })))
    }

    fn extract_withholding_tax(&self, account: &AccountRow<'_>) -> Result<Option<BrokerEvent>> {
        Ok(Some(BrokerEvent::WithholdingTax {
            date: account.value_date()?,
            amount: parse_amount(account.amount)?,
        }))
    }

    fn extract_interest(&self, account: &AccountRow<'_>) -> Result<Option<BrokerEvent>> {
        let amount = parse_amount(account.amount)?;
        if amount == 0.0 {
            return Ok(None);
        }

        Ok(Some(BrokerEvent::Interest(Dividend {
            date: account.value_date()?,
            symbol: account.currency.to_string(),
            amount,
            tax_withholding: 0.0,
            currency: account.currency.to_string(),
            product: format!("{} interest", account.currency),
        })))
    }
}

impl BrokerAdapter for DegiroAdapter {
    fn broker(&self) -> Broker {
        Broker::Degiro
    }

    fn input_files(&self) -> Vec<InputFile> {
        vec![
            InputFile::new(self.transactions_path.clone(), ENCODING),
            InputFile::new(self.account_path.clone(), ENCODING),
        ]
    }

    fn classify(&self, row: &StringRecord, file_index: usize) -> Result<RowCategory> {
        let category = match file_index {
            TRANSACTIONS_FILE => self.classify_transaction(row)?,
            ACCOUNT_FILE => self.classify_account(row)?,
            _ => RowCategory::Ignored,
        };
        trace!("File {} row classified as {:?}", file_index, category);
        Ok(category)
    }

    fn extract(&self, category: RowCategory, row: &StringRecord) -> Result<Option<BrokerEvent>> {
        if category == RowCategory::Trade {
            return self.extract_trade(row);
        }

        let account = AccountRow::from_record(row);
        match category {
            RowCategory::Forex => self.extract_forex_leg(&account),
            RowCategory::Deposit => self.extract_deposit(&account),
            RowCategory::Dividend => self.extract_dividend(&account),
            RowCategory::WithholdingTax => self.extract_withholding_tax(&account),
            RowCategory::Interest => self.extract_interest(&account),
            // DEGIRO exports carry no ticker to ISIN mapping
            RowCategory::InstrumentInfo
            | RowCategory::Trade
            | RowCategory::Header
            | RowCategory::Ignored => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn adapter() -> DegiroAdapter {
        DegiroAdapter::new(
            PathBuf::from("Transactions.csv"),
            PathBuf::from("Account.csv"),
        )
    }

    fn transaction(date: &str, quantity: &str, fee: &str, fee_currency: &str) -> StringRecord {
        StringRecord::from(vec![
            date,
            "09:04",
            "APPLE INC",
            "US0378331005",
            "NDQ",
            "XNAS",
            quantity,
            "170.50",
            "USD",
            "-1705.00",
            "USD",
            "-1550.12",
            "EUR",
            "1.0998",
            fee,
            fee_currency,
            "-1551.12",
            "EUR",
            "4f1a-order",
        ])
    }

    fn account(description: &str, currency: &str, amount: &str, order_id: &str) -> StringRecord {
        StringRecord::from(vec![
            "06-03-2024",
            "08:00",
            "05-03-2024",
            "APPLE INC",
            "US0378331005",
            description,
            "",
            currency,
            amount,
            "EUR",
            "100.00",
            order_id,
        ])
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_transactions_header_is_validated() {
        let adapter = adapter();
        let header = StringRecord::from(TRANSACTIONS_HEADER.to_vec());
        assert_eq!(adapter.classify(&header, 1).unwrap(), RowCategory::Header);

        let mut fields = TRANSACTIONS_HEADER.to_vec();
        fields[7] = "Preis";
        let result = adapter.classify(&StringRecord::from(fields), 1);
        match result {
            Err(ConverterError::HeaderMismatch { section }) => assert_eq!(section, "Transactions"),
            other => panic!("expected header mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_english_header_is_rejected() {
        let header = StringRecord::from(vec!["Date", "Time", "Product"]);
        assert!(matches!(
            adapter().classify(&header, 1),
            Err(ConverterError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_account_header_is_validated() {
        let adapter = adapter();
        let header = StringRecord::from(ACCOUNT_HEADER.to_vec());
        assert_eq!(adapter.classify(&header, 2).unwrap(), RowCategory::Header);

        let mut fields = ACCOUNT_HEADER.to_vec();
        fields.push("Extra");
        match adapter.classify(&StringRecord::from(fields), 2) {
            Err(ConverterError::HeaderMismatch { section }) => assert_eq!(section, "Account"),
            other => panic!("expected header mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_transaction_rows() {
        let adapter = adapter();
        assert_eq!(
            adapter.classify(&transaction("05-03-2024", "10", "", ""), 1).unwrap(),
            RowCategory::Trade
        );

        let continuation = StringRecord::from(vec!["", "", "CLASS A"]);
        assert_eq!(adapter.classify(&continuation, 1).unwrap(), RowCategory::Ignored);

        // Trades are only taken from the transactions file
        assert_ne!(
            adapter.classify(&transaction("05-03-2024", "10", "", ""), 2).unwrap(),
            RowCategory::Trade
        );
    }

    #[test]
    fn test_classify_account_rows() {
        let adapter = adapter();
        let cases = [
            ("Währungswechsel (Ausbuchung)", RowCategory::Forex),
            ("Währungswechsel (Einbuchung)", RowCategory::Forex),
            ("flatex Einzahlung", RowCategory::Deposit),
            ("Einzahlung", RowCategory::Deposit),
            ("Interne Einzahlung", RowCategory::Deposit),
            ("Dividende", RowCategory::Dividend),
            ("Dividendensteuer", RowCategory::WithholdingTax),
            ("Flatex Interest Income", RowCategory::Interest),
            ("Auszahlung", RowCategory::Ignored),
            ("Einzahlung Gebühr", RowCategory::Ignored),
        ];

        for (description, expected) in cases {
            let row = account(description, "EUR", "1.00", "");
            assert_eq!(adapter.classify(&row, 2).unwrap(), expected, "{description}");
        }
    }

    #[test]
    fn test_account_skip_predicate() {
        let adapter = adapter();

        // Cash side of a trade, already covered by Transactions.csv
        let linked = account("Dividende", "EUR", "1.00", "4f1a-order");
        assert_eq!(adapter.classify(&linked, 2).unwrap(), RowCategory::Ignored);

        // Currency exchanges keep their order id
        let forex = account("Währungswechsel (Ausbuchung)", "EUR", "-1.00", "4f1a-order");
        assert_eq!(adapter.classify(&forex, 2).unwrap(), RowCategory::Forex);

        let no_currency = account("Dividende", "", "", "");
        assert_eq!(adapter.classify(&no_currency, 2).unwrap(), RowCategory::Ignored);

        let dated = account("Dividende", "EUR", "1.00", "");
        let mut fields: Vec<&str> = dated.iter().collect();
        fields[0] = "";
        let undated = StringRecord::from(fields);
        assert_eq!(adapter.classify(&undated, 2).unwrap(), RowCategory::Ignored);
    }

    #[test]
    fn test_extract_buy_trade() {
        let adapter = adapter();
        let row = transaction("05-03-2024", "+10", "-1.00", "EUR");

        let event = adapter.extract(RowCategory::Trade, &row).unwrap().unwrap();
        let BrokerEvent::Trade { side, trade } = event else {
            panic!("expected trade");
        };
        assert_eq!(side, TradeSide::Buy);
        assert_eq!(trade.date, march(5));
        assert_eq!(trade.symbol, "US0378331005");
        assert_eq!(trade.quantity, 10.0);
        assert_eq!(trade.price, 170.5);
        assert_eq!(trade.fees, 1.0);
        assert_eq!(trade.currency, "USD");
        assert_eq!(trade.product, "APPLE INC");
    }

    #[test]
    fn test_extract_sell_trade_with_foreign_fee() {
        let adapter = adapter();
        let row = transaction("05-03-2024", "-4", "-2.00", "USD");

        let Some(BrokerEvent::Trade { side, trade }) =
            adapter.extract(RowCategory::Trade, &row).unwrap()
        else {
            panic!("expected trade");
        };
        assert_eq!(side, TradeSide::Sell);
        assert_eq!(trade.quantity, 4.0);
        assert!((trade.fees - 2.0 * 1.0998).abs() < 1e-9);
    }

    #[test]
    fn test_extract_trade_without_fee() {
        let row = transaction("05-03-2024", "10", "", "");

        let Some(BrokerEvent::Trade { trade, .. }) =
            adapter().extract(RowCategory::Trade, &row).unwrap()
        else {
            panic!("expected trade");
        };
        assert_eq!(trade.fees, 0.0);
    }

    #[test]
    fn test_extract_trade_rejects_bad_quantity() {
        let row = transaction("05-03-2024", "10,5", "", "");
        assert!(matches!(
            adapter().extract(RowCategory::Trade, &row),
            Err(ConverterError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_extract_forex_leg_uses_value_date() {
        let row = account("Währungswechsel (Einbuchung)", "USD", "108.20", "x");

        let event = adapter().extract(RowCategory::Forex, &row).unwrap();
        assert_eq!(
            event,
            Some(BrokerEvent::ForexLeg(ForexLeg {
                value_date: march(5),
                currency: "USD".to_string(),
                amount: 108.2,
            }))
        );
    }

    #[test]
    fn test_extract_deposit() {
        let adapter = adapter();

        let withdrawal = account("Einzahlung", "EUR", "-500.00", "");
        assert_eq!(adapter.extract(RowCategory::Deposit, &withdrawal).unwrap(), None);
        let zero = account("Einzahlung", "EUR", "0.00", "");
        assert_eq!(adapter.extract(RowCategory::Deposit, &zero).unwrap(), None);

        let deposit = account("Einzahlung", "EUR", "1,500.00", "");
        let Some(BrokerEvent::Deposit(conversion)) =
            adapter.extract(RowCategory::Deposit, &deposit).unwrap()
        else {
            panic!("expected deposit");
        };
        assert_eq!(conversion.foreign_amount, 1500.0);
        assert_eq!(conversion.source_fees, 0.0);
        assert_eq!(conversion.source_currency, "EUR");
        assert_eq!(conversion.target_currency, "EUR");
    }

    #[test]
    fn test_extract_dividend_and_withholding() {
        let adapter = adapter();

        let dividend = account("Dividende", "USD", "2.40", "");
        let Some(BrokerEvent::Dividend(record)) =
            adapter.extract(RowCategory::Dividend, &dividend).unwrap()
        else {
            panic!("expected dividend");
        };
        assert_eq!(record.symbol, "US0378331005");
        assert_eq!(record.amount, 2.4);
        assert_eq!(record.tax_withholding, 0.0);
        assert_eq!(record.product, "APPLE INC");

        let tax = account("Dividendensteuer", "USD", "-0.36", "");
        assert_eq!(
            adapter.extract(RowCategory::WithholdingTax, &tax).unwrap(),
            Some(BrokerEvent::WithholdingTax {
                date: march(5),
                amount: -0.36,
            })
        );
    }

    #[test]
    fn test_extract_interest() {
        let adapter = adapter();

        let zero = account("Flatex Interest Income", "EUR", "0.00", "");
        assert_eq!(adapter.extract(RowCategory::Interest, &zero).unwrap(), None);

        let interest = account("Flatex Interest Income", "EUR", "0.12", "");
        let Some(BrokerEvent::Interest(record)) =
            adapter.extract(RowCategory::Interest, &interest).unwrap()
        else {
            panic!("expected interest");
        };
        assert_eq!(record.symbol, "EUR");
        assert_eq!(record.currency, "EUR");
        assert_eq!(record.product, "EUR interest");
        assert_eq!(record.amount, 0.12);
    }

    #[test]
    fn test_instrument_information_is_not_extracted() {
        let row = account("Dividende", "USD", "2.40", "");
        assert_eq!(
            adapter().extract(RowCategory::InstrumentInfo, &row).unwrap(),
            None
        );
    }
}
