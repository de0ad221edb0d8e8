pub mod portfolio_model;
pub mod valuation_calculator;

pub use portfolio_model::{Portfolio, PortfolioItem, PortfolioSummary};
pub use valuation_calculator::{calculate_item_metrics, map_raw_portfolio, ItemMetrics};

#[cfg(test)]
pub(crate) mod tests;
