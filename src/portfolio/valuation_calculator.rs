use rust_decimal::Decimal;

use crate::constants::INVESTING_BASE_URL;
use crate::errors::Result;
use crate::instruments::RawInstrument;
use crate::lots::{process_instruments, InstrumentHolding, Lot};
use crate::math::{safe_add, safe_divide, safe_multiply, safe_subtract};

use super::{Portfolio, PortfolioItem, PortfolioSummary};

/// Per-instrument valuation metrics derived from the open lots and the
/// instrument's quote pair.
#[derive(Debug, Clone)]
pub struct ItemMetrics {
    pub num_shares: Decimal,
    pub total_invested: Decimal,
    pub market_value: Decimal,
    pub avg_price: Decimal,
    pub daily_change_eur: Decimal,
    pub daily_change_perc: Decimal,
    pub total_change_eur: Decimal,
    pub total_change_perc: Decimal,
    pub unrealized_pnl: Decimal,
}

/// Maps one raw input snapshot to the full portfolio view: lot allocation,
/// per-instrument metrics and the summary reduction. Pure and idempotent;
/// callers re-invoke it after every mutation instead of patching state.
pub fn map_raw_portfolio(raw_items: &[RawInstrument]) -> Result<Portfolio> {
    let holdings = process_instruments(raw_items)?;
    let items: Vec<PortfolioItem> = holdings.into_iter().map(build_item).collect();
    let summary = calculate_summary(&items);
    Ok(Portfolio { summary, items })
}

/// Computes valuation metrics for one lot list against a
/// `(previous, current)` price pair. All percentage deltas are defined to
/// be exactly 0 when the base value is 0.
pub fn calculate_item_metrics(
    lots: &[Lot],
    prev_price: Decimal,
    curr_price: Decimal,
) -> ItemMetrics {
    let num_shares = lots
        .iter()
        .fold(Decimal::ZERO, |acc, lot| safe_add(acc, lot.qty_remaining));
    let total_invested = lots
        .iter()
        .fold(Decimal::ZERO, |acc, lot| safe_add(acc, lot.total_cost));

    let market_value = safe_multiply(curr_price, num_shares);
    let prev_market_value = safe_multiply(prev_price, num_shares);
    let avg_price = if num_shares.is_zero() {
        Decimal::ZERO
    } else {
        safe_divide(total_invested, num_shares)
    };
    let unrealized_pnl = lots.iter().fold(Decimal::ZERO, |acc, lot| {
        safe_add(
            acc,
            safe_multiply(
                lot.qty_remaining,
                safe_subtract(curr_price, lot.cost_per_unit),
            ),
        )
    });

    ItemMetrics {
        num_shares,
        total_invested,
        market_value,
        avg_price,
        daily_change_eur: safe_subtract(market_value, prev_market_value),
        daily_change_perc: percent_change(prev_market_value, market_value),
        total_change_eur: safe_subtract(market_value, total_invested),
        total_change_perc: percent_change(total_invested, market_value),
        unrealized_pnl,
    }
}

fn build_item(holding: InstrumentHolding) -> PortfolioItem {
    let InstrumentHolding {
        instrument,
        records,
        lots,
        realized_pnl,
    } = holding;
    let metrics = calculate_item_metrics(&lots, instrument.prev_price, instrument.curr_price);

    PortfolioItem {
        isin: instrument.isin,
        name: instrument.name,
        link: compose_link(&instrument.kind, &instrument.link),
        num_shares: metrics.num_shares,
        total_invested: metrics.total_invested,
        market_value: metrics.market_value,
        prev_price: instrument.prev_price,
        curr_price: instrument.curr_price,
        avg_price: metrics.avg_price,
        daily_change_eur: metrics.daily_change_eur,
        daily_change_perc: metrics.daily_change_perc,
        total_change_eur: metrics.total_change_eur,
        total_change_perc: metrics.total_change_perc,
        unrealized_pnl: metrics.unrealized_pnl,
        realized_pnl,
        records,
        lots,
    }
}

/// Reduces per-instrument metrics into the portfolio summary. The
/// percentage fields are re-derived from the reduced absolute values;
/// summing per-instrument percentages would double-count relative weight.
fn calculate_summary(items: &[PortfolioItem]) -> PortfolioSummary {
    let invested = items
        .iter()
        .fold(Decimal::ZERO, |acc, i| safe_add(acc, i.total_invested));
    let market_value = items
        .iter()
        .fold(Decimal::ZERO, |acc, i| safe_add(acc, i.market_value));
    let prev_market_value = items.iter().fold(Decimal::ZERO, |acc, i| {
        safe_add(acc, safe_multiply(i.prev_price, i.num_shares))
    });

    PortfolioSummary {
        portfolio_invested: invested,
        portfolio_market_value: market_value,
        portfolio_change_eur: safe_subtract(market_value, invested),
        portfolio_change_perc: percent_change(invested, market_value),
        portfolio_daily_change_eur: safe_subtract(market_value, prev_market_value),
        portfolio_daily_change_perc: percent_change(prev_market_value, market_value),
    }
}

/// `(new − old) / old × 100`, exactly 0 when `old == 0`.
fn percent_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        return Decimal::ZERO;
    }
    safe_multiply(
        safe_divide(safe_subtract(new, old), old),
        Decimal::ONE_HUNDRED,
    )
}

fn compose_link(kind: &str, link: &str) -> String {
    format!("{}/{}/{}", INVESTING_BASE_URL, kind.to_lowercase(), link)
}
