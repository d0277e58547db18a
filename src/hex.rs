//! Decoding of hex-encoded quantities as returned by EVM JSON-RPC endpoints.
//!
//! Chain-native integers arrive as `0x`-prefixed base-16 strings. Wei-scale
//! quantities decode to `u128`; heights, timestamps and sizes to `u64`. A value
//! that does not fit the target type is an error, never a silent truncation.

use serde::{Deserialize, Deserializer};

#[derive(thiserror::Error, Debug)]
#[error("invalid hex quantity {0:?}")]
pub struct InvalidQuantity(pub String);

/// Decodes a `0x`-prefixed base-16 quantity. The prefix is optional on input.
pub fn quantity(raw: &str) -> Result<u128, InvalidQuantity> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Err(InvalidQuantity(raw.to_string()));
    }
    u128::from_str_radix(digits, 16).map_err(|_| InvalidQuantity(raw.to_string()))
}

pub fn quantity_u64(raw: &str) -> Result<u64, InvalidQuantity> {
    let value = quantity(raw)?;
    u64::try_from(value).map_err(|_| InvalidQuantity(raw.to_string()))
}

pub fn deserialize_u128<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    quantity(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    quantity_u64(&raw).map_err(serde::de::Error::custom)
}
