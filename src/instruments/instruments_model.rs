use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::RawRecord;

/// Per-instrument input as supplied by the persistence layer or an API
/// append: raw metadata, the latest quote pair and the ordered transaction
/// history. Everything but the identifier is defaulted so partially
/// populated storage entries still load.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawInstrument {
    /// Unique instrument identifier (ISIN-like string).
    pub isin: String,
    #[serde(default)]
    pub name: String,
    /// Instrument kind on the quote site (e.g. "etfs", "equities"); used
    /// to compose the display link.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub prev_price: Decimal,
    #[serde(default)]
    pub curr_price: Decimal,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl RawInstrument {
    /// Empty-metadata placeholder for an instrument first seen as a
    /// transfer destination.
    pub fn placeholder(isin: &str) -> Self {
        RawInstrument {
            isin: isin.to_string(),
            name: isin.to_string(),
            ..Default::default()
        }
    }
}
