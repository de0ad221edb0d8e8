use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// A transaction record as it arrives from storage or an API append:
/// untyped tag, any numeric field may be missing. Normalization turns
/// this into a [`TransactionRecord`].
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub execution_date: Option<String>,
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub num_shares: Option<Decimal>,
    #[serde(default)]
    pub price_per_share: Option<Decimal>,
    #[serde(default)]
    pub commission: Option<Decimal>,
    /// Target instrument when the record moves shares to another instrument.
    #[serde(default)]
    pub transfer_to: Option<String>,
    /// Source instrument on the receiving side of a transfer (audit only).
    #[serde(default)]
    pub transfer_from: Option<String>,
}

/// What a record does to a position, resolved exactly once during
/// normalization so the allocation engine never inspects raw tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// Opens a new lot.
    Buy,
    /// Consumes lots FIFO and realizes P&L.
    Sell,
    /// Consumes lots FIFO and carries their cost basis to `to`.
    TransferOut { to: String },
    /// Receiving-side marker; the paired transfer-out already moved the
    /// cost basis, so this creates and consumes nothing.
    TransferIn,
}

/// Canonical, fully populated transaction record. Immutable once built.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Canonical ISO-8601 UTC instant, or `""` when the raw date was
    /// absent or unparseable.
    pub date: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(with = "decimal_serde")]
    pub num_shares: Decimal,
    #[serde(with = "decimal_serde")]
    pub price_per_share: Decimal,
    #[serde(with = "decimal_serde")]
    pub commission: Decimal,
    /// Derived: `numShares × pricePerShare + commission`.
    #[serde(with = "decimal_serde")]
    pub total_cost: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_from: Option<String>,
    /// Resolved dispatch tag; `None` for record types the engine ignores.
    #[serde(skip)]
    pub kind: Option<RecordKind>,
}
