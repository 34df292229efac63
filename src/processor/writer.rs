//! XLSX writing module for converted tables
//!
//! Renders the six output tables into named sheets of one workbook. Floats
//! use a two-decimal number format, dates an ISO format, and column widths
//! are fitted to their content.

use crate::constants::{
    DATE_NUMBER_FORMAT, FLOAT_NUMBER_FORMAT, SHEET_BUY_ORDERS, SHEET_CURRENCY_CONVERSIONS,
    SHEET_DIVIDENDS, SHEET_ESPP, SHEET_RSU, SHEET_SELL_ORDERS,
};
use crate::error::Result;
use crate::models::{Dividend, EsppPurchase, ForexConversion, RsuVest, Trade};
use crate::tables::ConversionTables;
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::debug;

const BUY_ORDER_COLUMNS: &[&str] = &[
    "date", "symbol", "quantity", "buy_price", "fees", "currency", "Product",
];
const SELL_ORDER_COLUMNS: &[&str] = &[
    "date", "symbol", "quantity", "sell_price", "fees", "currency", "Product",
];
const DIVIDEND_COLUMNS: &[&str] = &[
    "date", "symbol", "amount", "tax_withholding", "currency", "Product",
];
const CURRENCY_CONVERSION_COLUMNS: &[&str] = &[
    "date",
    "foreign_amount",
    "source_fees",
    "source_currency",
    "target_currency",
];
const RSU_COLUMNS: &[&str] = &[
    "date",
    "symbol",
    "amount",
    "gross_quantity",
    "net_quantity",
    "fair_market_value",
    "currency",
    "Product",
];
const ESPP_COLUMNS: &[&str] = &[
    "date",
    "symbol",
    "buy_price",
    "fair_market_value",
    "quantity",
    "currency",
    "Product",
];

/// Value of one worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Date(NaiveDate),
    Number(f64),
    Text(&'a str),
}

/// A record rendered as one worksheet row, in column order
pub trait SheetRecord {
    fn cells(&self) -> Vec<Cell<'_>>;
}

impl SheetRecord for Trade {
    fn cells(&self) -> Vec<Cell<'_>> {
        vec![
            Cell::Date(self.date),
            Cell::Text(&self.symbol),
            Cell::Number(self.quantity),
            Cell::Number(self.price),
            Cell::Number(self.fees),
            Cell::Text(&self.currency),
            Cell::Text(&self.product),
        ]
    }
}

impl SheetRecord for Dividend {
    fn cells(&self) -> Vec<Cell<'_>> {
        vec![
            Cell::Date(self.date),
            Cell::Text(&self.symbol),
            Cell::Number(self.amount),
            Cell::Number(self.tax_withholding),
            Cell::Text(&self.currency),
            Cell::Text(&self.product),
        ]
    }
}

impl SheetRecord for ForexConversion {
    fn cells(&self) -> Vec<Cell<'_>> {
        vec![
            Cell::Date(self.date),
            Cell::Number(self.foreign_amount),
            Cell::Number(self.source_fees),
            Cell::Text(&self.source_currency),
            Cell::Text(&self.target_currency),
        ]
    }
}

impl SheetRecord for RsuVest {
    fn cells(&self) -> Vec<Cell<'_>> {
        vec![
            Cell::Date(self.date),
            Cell::Text(&self.symbol),
            Cell::Number(self.amount),
            Cell::Number(self.gross_quantity),
            Cell::Number(self.net_quantity),
            Cell::Number(self.fair_market_value),
            Cell::Text(&self.currency),
            Cell::Text(&self.product),
        ]
    }
}

impl SheetRecord for EsppPurchase {
    fn cells(&self) -> Vec<Cell<'_>> {
        vec![
            Cell::Date(self.date),
            Cell::Text(&self.symbol),
            Cell::Number(self.buy_price),
            Cell::Number(self.fair_market_value),
            Cell::Number(self.quantity),
            Cell::Text(&self.currency),
            Cell::Text(&self.product),
        ]
    }
}

struct CellFormats {
    header: Format,
    number: Format,
    date: Format,
}

/// Workbook writer for converted tables
#[derive(Debug)]
pub struct XlsxWriter {
    output_path: PathBuf,
}

impl XlsxWriter {
    /// Create a new XLSX writer
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write all six tables, replacing any existing file
    pub fn write(&self, tables: &ConversionTables) -> Result<()> {
        let formats = CellFormats {
            header: Format::new().set_bold(),
            number: Format::new().set_num_format(FLOAT_NUMBER_FORMAT),
            date: Format::new().set_num_format(DATE_NUMBER_FORMAT),
        };
        let mut workbook = Workbook::new();

        write_sheet(&mut workbook, &formats, SHEET_BUY_ORDERS, BUY_ORDER_COLUMNS, &tables.buy_orders)?;
        write_sheet(&mut workbook, &formats, SHEET_DIVIDENDS, DIVIDEND_COLUMNS, &tables.dividends)?;
        write_sheet(&mut workbook, &formats, SHEET_SELL_ORDERS, SELL_ORDER_COLUMNS, &tables.sell_orders)?;
        write_sheet(
            &mut workbook,
            &formats,
            SHEET_CURRENCY_CONVERSIONS,
            CURRENCY_CONVERSION_COLUMNS,
            &tables.currency_conversions,
        )?;
        write_sheet(&mut workbook, &formats, SHEET_RSU, RSU_COLUMNS, &tables.rsu)?;
        write_sheet(&mut workbook, &formats, SHEET_ESPP, ESPP_COLUMNS, &tables.espp)?;

        workbook.save(&self.output_path)?;
        debug!("Saved workbook {}", self.output_path.display());
        Ok(())
    }
}

fn write_sheet<R: SheetRecord>(
    workbook: &mut Workbook,
    formats: &CellFormats,
    name: &str,
    columns: &[&str],
    records: &[R],
) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *column, &formats.header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in record.cells().into_iter().enumerate() {
            write_cell(worksheet, formats, row, col as u16, cell)?;
        }
    }

    worksheet.autofit();
    debug!("Wrote sheet {} with {} rows", name, records.len());
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    formats: &CellFormats,
    row: u32,
    col: u16,
    cell: Cell<'_>,
) -> Result<()> {
    match cell {
        Cell::Date(date) => {
            let excel_date =
                ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
            worksheet.write_datetime_with_format(row, col, &excel_date, &formats.date)?;
        }
        Cell::Number(value) => {
            worksheet.write_number_with_format(row, col, value, &formats.number)?;
        }
        Cell::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}
