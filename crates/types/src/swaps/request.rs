//! Swap request model

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::routing::RoutingConfig;
use crate::tokens::TokenInfo;

/// Swapper execution mode
///
/// Serialized as the integer the swapper contract expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SwapperMode {
	/// Sell an exact input amount
	ExactIn,
	/// Buy an exact output amount
	ExactOut,
	/// Swap enough to leave a precise residual debt after repayment
	TargetDebt,
}

impl SwapperMode {
	pub fn as_u8(self) -> u8 {
		match self {
			Self::ExactIn => 0,
			Self::ExactOut => 1,
			Self::TargetDebt => 2,
		}
	}

	pub fn as_u256(self) -> U256 {
		U256::from(self.as_u8())
	}
}

impl TryFrom<u8> for SwapperMode {
	type Error = String;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::ExactIn),
			1 => Ok(Self::ExactOut),
			2 => Ok(Self::TargetDebt),
			other => Err(format!("unknown swapper mode {}", other)),
		}
	}
}

impl From<SwapperMode> for u8 {
	fn from(mode: SwapperMode) -> Self {
		mode.as_u8()
	}
}

impl fmt::Display for SwapperMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ExactIn => write!(f, "exact-in"),
			Self::ExactOut => write!(f, "exact-out"),
			Self::TargetDebt => write!(f, "target-debt"),
		}
	}
}

/// A swap to quote and assemble.
///
/// Never mutated during a pipeline traversal: strategies build derived copies
/// through the `with_*` methods.
#[derive(Debug, Clone)]
pub struct SwapRequest {
	pub chain_id: u64,
	pub token_in: TokenInfo,
	pub token_out: TokenInfo,
	pub account_in: Address,
	pub account_out: Address,
	/// Vault receiving unused input
	pub vault_in: Address,
	/// Vault receiving the bought asset (deposit or repay)
	pub receiver: Address,
	/// EOA submitting the transaction
	pub origin: Address,
	/// Swapper contract executing the multicall
	pub from: Address,
	pub mode: SwapperMode,
	/// Exact in: amount to sell. Exact out: amount to buy. Target debt: estimated amount to buy.
	pub amount: U256,
	pub target_debt: U256,
	pub current_debt: U256,
	pub slippage_bps: u32,
	/// Quote expiry, unix seconds
	pub deadline: u64,
	pub is_repay: bool,
	pub routing_override: Option<RoutingConfig>,
	/// Only accept exact-out quotes whose input is fixed, overswapping otherwise
	pub only_fixed_input_exact_out: bool,
	/// Nesting level of the pipeline call handling this request
	pub depth: u32,
	/// Instant after which the whole request is abandoned
	pub expires_at: Option<Instant>,
}

impl SwapRequest {
	pub fn is_exact_in_repay(&self) -> bool {
		self.mode == SwapperMode::ExactIn && self.is_repay
	}

	pub fn involves_token(&self, token: Address) -> bool {
		self.token_in.address == token || self.token_out.address == token
	}

	pub fn involves_principal_token(&self) -> bool {
		self.token_in.meta.is_principal_token || self.token_out.meta.is_principal_token
	}

	/// Market of the principal token on either side, input first
	pub fn principal_market(&self) -> Option<Address> {
		self.token_in
			.meta
			.principal_market
			.or(self.token_out.meta.principal_market)
	}

	/// Time left before the request deadline, `None` when unbounded
	pub fn remaining(&self) -> Option<Duration> {
		self.expires_at
			.map(|at| at.saturating_duration_since(Instant::now()))
	}

	pub fn is_expired(&self) -> bool {
		matches!(self.remaining(), Some(left) if left.is_zero())
	}

	pub fn with_receiver(mut self, receiver: Address) -> Self {
		self.receiver = receiver;
		self
	}

	pub fn with_mode(mut self, mode: SwapperMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_amount(mut self, amount: U256) -> Self {
		self.amount = amount;
		self
	}

	pub fn with_token_in(mut self, token: TokenInfo) -> Self {
		self.token_in = token;
		self
	}

	pub fn with_token_out(mut self, token: TokenInfo) -> Self {
		self.token_out = token;
		self
	}

	pub fn with_vault_in(mut self, vault: Address) -> Self {
		self.vault_in = vault;
		self
	}

	pub fn with_repay(mut self, is_repay: bool) -> Self {
		self.is_repay = is_repay;
		self
	}

	pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
		self.routing_override = Some(routing);
		self
	}

	pub fn with_only_fixed_input_exact_out(mut self, only_fixed_input: bool) -> Self {
		self.only_fixed_input_exact_out = only_fixed_input;
		self
	}

	pub fn with_expiry(mut self, expires_at: Instant) -> Self {
		self.expires_at = Some(expires_at);
		self
	}

	/// Copy handed to a nested pipeline call
	pub fn nested(mut self) -> Self {
		self.depth += 1;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::sample_request;

	#[test]
	fn test_mode_serializes_as_integer() {
		assert_eq!(serde_json::to_string(&SwapperMode::TargetDebt).unwrap(), "2");
		let mode: SwapperMode = serde_json::from_str("1").unwrap();
		assert_eq!(mode, SwapperMode::ExactOut);
		assert!(serde_json::from_str::<SwapperMode>("3").is_err());
	}

	#[test]
	fn test_derived_copies_leave_original_untouched() {
		let request = sample_request();
		let inner = request
			.clone()
			.with_receiver(request.from)
			.with_repay(false)
			.nested();

		assert_eq!(inner.receiver, request.from);
		assert_eq!(inner.depth, 1);
		assert_ne!(request.receiver, request.from);
		assert_eq!(request.depth, 0);
	}

	#[test]
	fn test_exact_in_repay() {
		let request = sample_request().with_repay(true);
		assert!(request.is_exact_in_repay());
		assert!(!request.with_mode(SwapperMode::TargetDebt).is_exact_in_repay());
	}

	#[test]
	fn test_expiry() {
		let request = sample_request();
		assert!(request.remaining().is_none());
		assert!(!request.is_expired());

		let expired = sample_request().with_expiry(Instant::now());
		assert!(expired.is_expired());
	}
}
