//! In-memory output tables for one conversion run.
//!
//! Records are appended in file order and sorted by date once every input
//! file has been consumed. The only in-place mutation is the withholding tax
//! back-fill of the most recently appended dividend.

use crate::error::{ConverterError, Result};
use crate::models::{
    Dividend, EsppPurchase, ForexConversion, ForexLeg, RsuVest, Trade, TradeSide,
};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Assembly state of a currency exchange described by two adjacent rows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ForexState {
    #[default]
    Idle,
    AwaitingSecondLeg(ForexConversion),
}

impl ForexState {
    /// Feed one leg, returning the completed conversion once both legs are seen
    pub fn accept(&mut self, leg: ForexLeg) -> Option<ForexConversion> {
        match std::mem::take(self) {
            ForexState::Idle => {
                *self = ForexState::AwaitingSecondLeg(ForexConversion {
                    date: leg.value_date,
                    foreign_amount: leg.amount.abs(),
                    source_fees: 0.0,
                    source_currency: leg.currency.clone(),
                    target_currency: leg.currency,
                });
                None
            }
            ForexState::AwaitingSecondLeg(mut pending) => {
                if leg.amount < 0.0 {
                    // Only the sold leg defines the source side
                    pending.foreign_amount = -leg.amount;
                    pending.source_currency = leg.currency;
                } else {
                    pending.target_currency = leg.currency;
                }
                Some(pending)
            }
        }
    }
}

/// The six output tables plus the state shared between consecutive rows
#[derive(Debug, Clone, Default)]
pub struct ConversionTables {
    pub buy_orders: Vec<Trade>,
    pub sell_orders: Vec<Trade>,
    pub dividends: Vec<Dividend>,
    pub currency_conversions: Vec<ForexConversion>,
    pub rsu: Vec<RsuVest>,
    pub espp: Vec<EsppPurchase>,
    forex_state: ForexState,
    last_dividend: Option<usize>,
}

impl ConversionTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_trade(&mut self, side: TradeSide, trade: Trade) {
        match side {
            TradeSide::Buy => self.buy_orders.push(trade),
            TradeSide::Sell => self.sell_orders.push(trade),
        }
    }

    /// Append a dividend and remember it as the target of the next back-fill
    pub fn push_dividend(&mut self, dividend: Dividend) {
        self.dividends.push(dividend);
        self.last_dividend = Some(self.dividends.len() - 1);
    }

    pub fn push_conversion(&mut self, conversion: ForexConversion) {
        self.currency_conversions.push(conversion);
    }

    /// Apply one forex leg; returns true when it completed a conversion
    pub fn apply_forex_leg(&mut self, leg: ForexLeg) -> bool {
        match self.forex_state.accept(leg) {
            Some(conversion) => {
                debug!(
                    "Completed conversion {} -> {} ({:.2})",
                    conversion.source_currency,
                    conversion.target_currency,
                    conversion.foreign_amount
                );
                self.currency_conversions.push(conversion);
                true
            }
            None => false,
        }
    }

    /// Set the tax withheld on the most recently appended dividend
    pub fn backfill_withholding(&mut self, date: NaiveDate, tax: f64) -> Result<()> {
        let index = self
            .last_dividend
            .ok_or(ConverterError::OrphanWithholdingTax { date })?;
        let dividend = &mut self.dividends[index];
        if dividend.date != date {
            debug!(
                "Withholding tax dated {} back-filled into dividend dated {}",
                date, dividend.date
            );
        }
        dividend.tax_withholding = tax;
        Ok(())
    }

    /// Replace `ticker` by `isin` in every trade and dividend symbol
    pub fn replace_symbol(&mut self, ticker: &str, isin: &str) -> usize {
        let mut replaced = 0;
        let trade_symbols = self
            .buy_orders
            .iter_mut()
            .chain(self.sell_orders.iter_mut())
            .map(|trade| &mut trade.symbol);
        let dividend_symbols = self.dividends.iter_mut().map(|dividend| &mut dividend.symbol);

        for symbol in trade_symbols.chain(dividend_symbols) {
            if symbol.as_str() == ticker {
                *symbol = isin.to_string();
                replaced += 1;
            }
        }
        replaced
    }

    pub fn pending_forex(&self) -> Option<&ForexConversion> {
        match &self.forex_state {
            ForexState::AwaitingSecondLeg(pending) => Some(pending),
            ForexState::Idle => None,
        }
    }

    /// Drop an unmatched forex leg left over at the end of the input
    pub fn discard_pending_forex(&mut self) -> Option<ForexConversion> {
        match std::mem::take(&mut self.forex_state) {
            ForexState::AwaitingSecondLeg(pending) => {
                warn!(
                    "Discarding unmatched currency exchange leg dated {} ({} {:.2})",
                    pending.date, pending.source_currency, pending.foreign_amount
                );
                Some(pending)
            }
            ForexState::Idle => None,
        }
    }

    /// Stable sort of every table by date
    pub fn sort_by_date(&mut self) {
        self.buy_orders.sort_by_key(|trade| trade.date);
        self.sell_orders.sort_by_key(|trade| trade.date);
        self.dividends.sort_by_key(|dividend| dividend.date);
        self.currency_conversions.sort_by_key(|conversion| conversion.date);
        self.rsu.sort_by_key(|vest| vest.date);
        self.espp.sort_by_key(|purchase| purchase.date);
        // Indices are meaningless after reordering
        self.last_dividend = None;
    }
}
