use rust_decimal::Decimal;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

use crate::constants::DECIMAL_PRECISION;

// Custom serializer/deserializer for Decimal (rounds on serialization)
pub mod decimal_serde {
    use super::*;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rounded = value.round_dp(DECIMAL_PRECISION).normalize();
        serializer.serialize_str(&rounded.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        Decimal::from_str(&s).map_err(|_| D::Error::custom("Invalid Decimal"))
    }
}
