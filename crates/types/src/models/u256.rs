//! Decimal string handling for U256 amounts
//!
//! Amounts travel over HTTP as base-10 strings to preserve precision.

use alloy_primitives::U256;

/// Parse a decimal amount string. Empty input is treated as zero.
pub fn parse_amount(value: &str) -> Result<U256, String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Ok(U256::ZERO);
	}
	if !trimmed.chars().all(|c| c.is_ascii_digit()) {
		return Err(format!("amount must contain only digits: {}", trimmed));
	}
	U256::from_str_radix(trimmed, 10).map_err(|e| format!("invalid amount {}: {}", trimmed, e))
}

/// Serde adapter serializing U256 as a decimal string
pub mod u256_decimal {
	use alloy_primitives::U256;
	use serde::{de, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		super::parse_amount(&raw).map_err(de::Error::custom)
	}
}
