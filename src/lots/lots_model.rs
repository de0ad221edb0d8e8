use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::instruments::RawInstrument;
use crate::math::{safe_add, safe_multiply, safe_subtract};
use crate::records::TransactionRecord;
use crate::utils::decimal_serde::*;

/// A cost-basis tranche of one instrument.
///
/// Lots are created by buy records or by the receiving side of a transfer,
/// are never merged, and persist after full depletion for audit/history.
/// `total_cost` is re-derived as `qty_remaining × cost_per_unit` after
/// every consumption, so summing it over a lot list always equals the
/// invested capital still attributed to those lots.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Deterministic identifier: `{isin}-{date}-{sequenceIndex}`.
    pub id: String,
    pub created_date: String,
    #[serde(with = "decimal_serde")]
    pub qty_remaining: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_per_unit: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_cost: Decimal,
}

impl Lot {
    pub fn new(
        instrument_id: &str,
        date: &str,
        index: usize,
        qty: Decimal,
        cost_per_unit: Decimal,
        total_cost: Decimal,
    ) -> Self {
        Lot {
            id: format!("{}-{}-{}", instrument_id, date, index),
            created_date: date.to_string(),
            qty_remaining: qty,
            cost_per_unit,
            total_cost,
        }
    }

    /// Removes `matched` shares from the lot and re-syncs `total_cost`.
    /// Callers guarantee `matched <= qty_remaining`, so the remaining
    /// quantity never goes negative.
    pub fn consume(&mut self, matched: Decimal) {
        self.qty_remaining = safe_subtract(self.qty_remaining, matched);
        self.total_cost = safe_multiply(self.qty_remaining, self.cost_per_unit);
    }
}

/// Per-instrument output of one engine run: the raw metadata it was seeded
/// from, its canonical records, the FIFO-ordered lot list and the realized
/// P&L accumulated from sells.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentHolding {
    pub instrument: RawInstrument,
    pub records: Vec<TransactionRecord>,
    pub lots: Vec<Lot>,
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
}

impl InstrumentHolding {
    pub fn new(instrument: RawInstrument) -> Self {
        InstrumentHolding {
            instrument,
            records: Vec::new(),
            lots: Vec::new(),
            realized_pnl: Decimal::ZERO,
        }
    }

    /// Shares still held, over all lots.
    pub fn num_shares(&self) -> Decimal {
        self.lots
            .iter()
            .fold(Decimal::ZERO, |acc, lot| safe_add(acc, lot.qty_remaining))
    }

    /// Invested capital attributed to the held shares. Depleted lots carry
    /// a synced `total_cost` of 0, so summing over all lots and summing
    /// over open lots agree.
    pub fn total_invested(&self) -> Decimal {
        self.lots
            .iter()
            .fold(Decimal::ZERO, |acc, lot| safe_add(acc, lot.total_cost))
    }
}
