use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lots::Lot;
use crate::records::TransactionRecord;
use crate::utils::decimal_serde::*;

/// Fully computed per-instrument view: position size, valuation metrics,
/// and the audit trail (normalized records, lots, realized P&L) behind
/// them.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub isin: String,
    pub name: String,
    /// Quote-page URL composed from the instrument kind and stored link.
    pub link: String,
    #[serde(with = "decimal_serde")]
    pub num_shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub prev_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub curr_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_price: Decimal,
    #[serde(rename = "dailyChangeEUR", with = "decimal_serde")]
    pub daily_change_eur: Decimal,
    #[serde(with = "decimal_serde")]
    pub daily_change_perc: Decimal,
    #[serde(rename = "totalChangeEUR", with = "decimal_serde")]
    pub total_change_eur: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_change_perc: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
    pub records: Vec<TransactionRecord>,
    pub lots: Vec<Lot>,
}

/// Portfolio-level aggregates, reduced by addition over all items; the
/// percentage fields are re-derived from the reduced absolutes rather
/// than summed.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(with = "decimal_serde")]
    pub portfolio_invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub portfolio_market_value: Decimal,
    #[serde(rename = "portfolioChangeEUR", with = "decimal_serde")]
    pub portfolio_change_eur: Decimal,
    #[serde(with = "decimal_serde")]
    pub portfolio_change_perc: Decimal,
    #[serde(rename = "portfolioDailyChangeEUR", with = "decimal_serde")]
    pub portfolio_daily_change_eur: Decimal,
    #[serde(with = "decimal_serde")]
    pub portfolio_daily_change_perc: Decimal,
}

/// The full portfolio view consumed by the API layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub summary: PortfolioSummary,
    pub items: Vec<PortfolioItem>,
}
