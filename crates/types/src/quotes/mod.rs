//! Provider quote model
//!
//! A `Quote` is the normalized answer of a liquidity source before it is turned
//! into swapper calldata.

pub mod errors;

use alloy_primitives::{Address, Bytes, U256};

pub use errors::{SourceError, SourceResult};

/// Normalized liquidity source quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
	pub amount_in: U256,
	pub amount_in_max: Option<U256>,
	pub amount_out: U256,
	pub amount_out_min: Option<U256>,
	/// Provider payload, `abi.encode(address target, bytes data)` for generic handlers
	pub data: Bytes,
	/// Provider label used in routes
	pub protocol: String,
	/// Spender that must be approved before the swap call
	pub allowance_target: Option<Address>,
	/// Provider cannot deliver to the receiver; output must be swept from the swapper
	pub must_forward_to_receiver: bool,
}

impl Quote {
	pub fn new(amount_in: U256, amount_out: U256, data: Bytes, protocol: impl Into<String>) -> Self {
		Self {
			amount_in,
			amount_in_max: None,
			amount_out,
			amount_out_min: None,
			data,
			protocol: protocol.into(),
			allowance_target: None,
			must_forward_to_receiver: false,
		}
	}

	pub fn with_amount_in_max(mut self, amount: U256) -> Self {
		self.amount_in_max = Some(amount);
		self
	}

	pub fn with_amount_out_min(mut self, amount: U256) -> Self {
		self.amount_out_min = Some(amount);
		self
	}

	pub fn with_allowance_target(mut self, spender: Option<Address>) -> Self {
		self.allowance_target = spender;
		self
	}

	pub fn forwarding_to_receiver(mut self, must_forward: bool) -> Self {
		self.must_forward_to_receiver = must_forward;
		self
	}
}
