//! Test utilities for creating common test objects
//!
//! Builder and fixtures for `SwapRequest` with sensible mainnet defaults.

use alloy_primitives::{address, Address, U256};

use crate::routing::RoutingConfig;
use crate::swaps::{SwapRequest, SwapperMode};
use crate::tokens::TokenInfo;

pub const TEST_CHAIN_ID: u64 = 1;
pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const TEST_SWAPPER: Address = address!("2bba09866b6f1025258542478c39720a09b728bf");
pub const TEST_VERIFIER: Address = address!("ae26485acddefd486fe9ad7c2b34169d360737c7");
pub const TEST_RECEIVER: Address = address!("d8b27cf359b7d15710a5be299af6e7bf904984c2");
pub const TEST_VAULT_IN: Address = address!("797dd80692c3b2dadabce8e30c07fde5307d48a9");
pub const TEST_ACCOUNT: Address = address!("8a54c278d117854486db0f6460d901a180fff5aa");

pub fn usdc() -> TokenInfo {
	TokenInfo::new(TEST_CHAIN_ID, USDC, 6, "USDC")
}

pub fn weth() -> TokenInfo {
	TokenInfo::new(TEST_CHAIN_ID, WETH, 18, "WETH")
}

/// Builder for creating test SwapRequest objects
#[derive(Debug, Clone)]
pub struct SwapRequestBuilder {
	request: SwapRequest,
}

impl Default for SwapRequestBuilder {
	fn default() -> Self {
		Self {
			request: SwapRequest {
				chain_id: TEST_CHAIN_ID,
				token_in: usdc(),
				token_out: weth(),
				account_in: TEST_ACCOUNT,
				account_out: TEST_ACCOUNT,
				vault_in: TEST_VAULT_IN,
				receiver: TEST_RECEIVER,
				origin: TEST_ACCOUNT,
				from: TEST_SWAPPER,
				mode: SwapperMode::ExactIn,
				amount: U256::from(100u64),
				target_debt: U256::ZERO,
				current_debt: U256::ZERO,
				slippage_bps: 50,
				deadline: 1_736_263_541,
				is_repay: false,
				routing_override: None,
				only_fixed_input_exact_out: false,
				depth: 0,
				expires_at: None,
			},
		}
	}
}

impl SwapRequestBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.request.chain_id = chain_id;
		self
	}

	pub fn token_in(mut self, token: TokenInfo) -> Self {
		self.request.token_in = token;
		self
	}

	pub fn token_out(mut self, token: TokenInfo) -> Self {
		self.request.token_out = token;
		self
	}

	pub fn mode(mut self, mode: SwapperMode) -> Self {
		self.request.mode = mode;
		self
	}

	pub fn amount(mut self, amount: u128) -> Self {
		self.request.amount = U256::from(amount);
		self
	}

	pub fn target_debt(mut self, amount: u128) -> Self {
		self.request.target_debt = U256::from(amount);
		self
	}

	pub fn current_debt(mut self, amount: u128) -> Self {
		self.request.current_debt = U256::from(amount);
		self
	}

	pub fn slippage_bps(mut self, bps: u32) -> Self {
		self.request.slippage_bps = bps;
		self
	}

	pub fn receiver(mut self, receiver: Address) -> Self {
		self.request.receiver = receiver;
		self
	}

	pub fn repay(mut self, is_repay: bool) -> Self {
		self.request.is_repay = is_repay;
		self
	}

	pub fn routing(mut self, routing: RoutingConfig) -> Self {
		self.request.routing_override = Some(routing);
		self
	}

	pub fn build(self) -> SwapRequest {
		self.request
	}
}

/// Exact-in USDC -> WETH request of 100 base units at 0.5% slippage
pub fn sample_request() -> SwapRequest {
	SwapRequestBuilder::new().build()
}
