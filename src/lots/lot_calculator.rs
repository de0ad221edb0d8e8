use std::collections::HashMap;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::instruments::RawInstrument;
use crate::math::{safe_add, safe_divide, safe_multiply, safe_subtract};
use crate::records::{normalize_records, RecordKind, TransactionRecord};

use super::{CalculatorError, InstrumentHolding, Lot, Result};

/// Insertion-ordered map of instrument id to holding state, built once per
/// engine run and owned exclusively by it. First-seen order (including
/// instruments first seen as transfer destinations) is the emit order.
struct ItemMap {
    order: Vec<String>,
    entries: HashMap<String, InstrumentHolding>,
}

impl ItemMap {
    fn new() -> Self {
        ItemMap {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Seeds (or re-seeds, last wins) an entry while keeping its original
    /// position in the emit order.
    fn seed(&mut self, holding: InstrumentHolding) {
        let isin = holding.instrument.isin.clone();
        if self.entries.insert(isin.clone(), holding).is_none() {
            self.order.push(isin);
        }
    }

    /// Creates an empty-metadata entry for a not-yet-seen transfer
    /// destination.
    fn ensure(&mut self, isin: &str) {
        if !self.entries.contains_key(isin) {
            self.seed(InstrumentHolding::new(RawInstrument::placeholder(isin)));
        }
    }

    fn get_mut(&mut self, isin: &str) -> Result<&mut InstrumentHolding> {
        self.entries
            .get_mut(isin)
            .ok_or_else(|| CalculatorError::Internal(format!("missing entry for {}", isin)))
    }

    fn lot_count(&self, isin: &str) -> usize {
        self.entries.get(isin).map_or(0, |e| e.lots.len())
    }

    fn into_holdings(mut self) -> Vec<InstrumentHolding> {
        self.order
            .drain(..)
            .filter_map(|isin| self.entries.remove(&isin))
            .collect()
    }
}

/// Runs the full lot allocation over one input snapshot: seeds one holding
/// per instrument, opens lots from buys, then applies sells and transfers
/// in original record order with FIFO matching. Re-running on the same
/// input yields identical output; no state survives between runs.
pub fn process_instruments(raw_items: &[RawInstrument]) -> Result<Vec<InstrumentHolding>> {
    // Normalize each instrument's records exactly once, aligned by index
    // with the input so duplicate-keyed items still process their own
    // history.
    let normalized: Vec<Vec<TransactionRecord>> = raw_items
        .iter()
        .map(|item| normalize_records(&item.records))
        .collect();

    let mut items = ItemMap::new();

    // Phase 1 - seed
    for (item, records) in raw_items.iter().zip(&normalized) {
        let mut holding = InstrumentHolding::new(item.clone());
        holding.records = records.clone();
        items.seed(holding);
    }

    // Phase 2 - open lots from buys; lot lists end up FIFO-ordered by
    // construction
    for (item, records) in raw_items.iter().zip(&normalized) {
        create_lots_from_buys(&mut items, &item.isin, records)?;
    }

    // Phase 3 - apply sells and transfers in original record order
    for (item, records) in raw_items.iter().zip(&normalized) {
        for record in records {
            match &record.kind {
                Some(RecordKind::Sell) => process_sell(&mut items, &item.isin, record)?,
                Some(RecordKind::TransferOut { to }) => {
                    process_transfer(&mut items, &item.isin, to, record)?
                }
                // Buys were consumed in phase 2; transfer-in markers and
                // unrecognized types carry no position effect.
                _ => {}
            }
        }
    }

    // Phase 4 - emit in first-seen order
    Ok(items.into_holdings())
}

fn create_lots_from_buys(
    items: &mut ItemMap,
    isin: &str,
    records: &[TransactionRecord],
) -> Result<()> {
    let entry = items.get_mut(isin)?;
    for (index, record) in records
        .iter()
        .filter(|r| r.kind == Some(RecordKind::Buy))
        .enumerate()
    {
        if record.num_shares.is_zero() {
            debug!(
                "Buy record {} on {} has zero quantity; opening an empty lot",
                index, isin
            );
        }
        let cost_per_unit = safe_divide(record.total_cost, record.num_shares);
        entry.lots.push(Lot::new(
            isin,
            &record.date,
            index,
            record.num_shares,
            cost_per_unit,
            record.total_cost,
        ));
    }
    Ok(())
}

fn process_sell(items: &mut ItemMap, isin: &str, record: &TransactionRecord) -> Result<()> {
    let requested = record.num_shares;
    let sell_price = record.price_per_share;
    let total_commission = record.commission;

    let entry = items.get_mut(isin)?;
    let mut realized = entry.realized_pnl;
    let unmatched = match_lots(&mut entry.lots, requested, |matched, lot| {
        let prorated_fee = prorate_fee(total_commission, matched, requested);
        let proceeds = safe_multiply(matched, sell_price);
        let cost = safe_multiply(matched, lot.cost_per_unit);
        let pnl = safe_subtract(safe_subtract(proceeds, cost), prorated_fee);
        realized = safe_add(realized, pnl);
        lot.consume(matched);
    });
    entry.realized_pnl = realized;

    if unmatched > Decimal::ZERO {
        warn!(
            "Sell of {} on {} exceeds held quantity by {}; excess left unmatched",
            requested, isin, unmatched
        );
    }
    Ok(())
}

fn process_transfer(
    items: &mut ItemMap,
    isin: &str,
    target_isin: &str,
    record: &TransactionRecord,
) -> Result<()> {
    let requested = record.num_shares;
    let total_commission = record.commission;

    items.ensure(target_isin);
    let target_lot_start = items.lot_count(target_isin);

    // Match against the source first; the new destination lots are
    // collected and appended afterwards so a self-transfer cannot consume
    // its own freshly created lots.
    let mut transferred: Vec<Lot> = Vec::new();
    let source = items.get_mut(isin)?;
    let unmatched = match_lots(&mut source.lots, requested, |matched, lot| {
        let prorated_fee = prorate_fee(total_commission, matched, requested);
        // Cost basis carries over: the matched cost plus fee becomes the
        // new lot's total cost. A transfer is not a taxable disposal, so
        // realized P&L is untouched on both sides.
        let carried_cost = safe_add(safe_multiply(matched, lot.cost_per_unit), prorated_fee);
        let cost_per_unit = if matched.is_zero() {
            lot.cost_per_unit
        } else {
            safe_divide(carried_cost, matched)
        };
        lot.consume(matched);

        let mut new_lot = Lot::new(
            target_isin,
            &record.date,
            target_lot_start + transferred.len(),
            matched,
            cost_per_unit,
            carried_cost,
        );
        // The acquisition date travels with the shares; only the id is
        // keyed on the transfer date.
        new_lot.created_date = lot.created_date.clone();
        transferred.push(new_lot);
    });

    if unmatched > Decimal::ZERO {
        warn!(
            "Transfer of {} from {} to {} exceeds held quantity by {}; excess left unmatched",
            requested, isin, target_isin, unmatched
        );
    }

    items.get_mut(target_isin)?.lots.extend(transferred);
    Ok(())
}

/// Walks the lot list in creation order, consuming
/// `min(remainingNeeded, lot.qtyRemaining)` from each open lot and handing
/// the matched amount to the callback. Stops at zero remaining need or
/// list exhaustion; demand beyond the available quantity is returned to
/// the caller instead of raised.
fn match_lots<F>(lots: &mut [Lot], qty_needed: Decimal, mut on_match: F) -> Decimal
where
    F: FnMut(Decimal, &mut Lot),
{
    let mut remaining = qty_needed;
    for lot in lots.iter_mut() {
        if remaining <= Decimal::ZERO {
            break;
        }
        if lot.qty_remaining <= Decimal::ZERO {
            continue;
        }
        let matched = remaining.min(lot.qty_remaining);
        on_match(matched, lot);
        remaining = safe_subtract(remaining, matched);
    }
    remaining.max(Decimal::ZERO)
}

/// Linear commission proration: the fee attributed to a partial match is
/// `totalFee × matched / requested`. A zero requested quantity attaches
/// the whole fee to the match rather than dividing by zero.
fn prorate_fee(total_fee: Decimal, matched: Decimal, requested: Decimal) -> Decimal {
    if total_fee.is_zero() {
        return Decimal::ZERO;
    }
    if requested.is_zero() {
        return total_fee;
    }
    safe_multiply(total_fee, safe_divide(matched, requested))
}
