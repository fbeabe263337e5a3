//! Swap result models returned to callers

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::models::u256::u256_decimal;
use crate::tokens::TokenInfo;

/// One atomic operation of the swapper multicall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticallItem {
	pub function_name: String,
	/// Human readable arguments
	pub args: serde_json::Value,
	/// Encoded swapper call
	pub data: Bytes,
}

/// Swapper multicall payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPayload {
	pub swapper_address: Address,
	pub swapper_data: Bytes,
	pub multicall_items: Vec<MulticallItem>,
}

/// Verification performed by the verifier contract after the swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationKind {
	/// Minimum amount skimmed into the receiver vault
	SkimMin,
	/// Maximum debt left in the receiver vault
	DebtMax,
}

/// Verifier payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
	pub verifier_address: Address,
	pub verifier_data: Bytes,
	#[serde(rename = "type")]
	pub kind: VerificationKind,
	pub vault: Address,
	pub account: Address,
	#[serde(with = "u256_decimal")]
	pub amount: U256,
	pub deadline: u64,
}

/// Route label of a liquidity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteItem {
	pub provider_name: String,
}

impl RouteItem {
	pub fn new(provider_name: impl Into<String>) -> Self {
		Self {
			provider_name: provider_name.into(),
		}
	}
}

/// A fully assembled swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
	#[serde(with = "u256_decimal")]
	pub amount_in: U256,
	#[serde(with = "u256_decimal")]
	pub amount_in_max: U256,
	#[serde(with = "u256_decimal")]
	pub amount_out: U256,
	#[serde(with = "u256_decimal")]
	pub amount_out_min: U256,
	pub vault_in: Address,
	pub receiver: Address,
	pub account_in: Address,
	pub account_out: Address,
	pub token_in: TokenInfo,
	pub token_out: TokenInfo,
	pub slippage_bps: u32,
	pub route: Vec<RouteItem>,
	pub swap: SwapPayload,
	pub verify: VerifyPayload,
}

impl SwapResult {
	/// Provider labels in route order
	pub fn route_labels(&self) -> Vec<&str> {
		self.route.iter().map(|r| r.provider_name.as_str()).collect()
	}
}
