//! Shared collaborators handed to every strategy

use std::fmt;
use std::sync::Arc;

use swap_types::constants::limits::{
	DEFAULT_INTEREST_BUFFER_BPS, DEFAULT_OVERSWAP_TOLERANCE_BPS, DEFAULT_SOURCE_TIMEOUT_MS,
	DEFAULT_UNDERSWAP_TOLERANCE_BPS,
};
use swap_types::{Address, ContractBook, TokenLookup};

use crate::chain::ChainReader;
use crate::errors::{StrategyError, StrategyResult};
use crate::sources::{SourceRegistry, UniswapRouter};

/// Numeric knobs of the strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
	pub interest_buffer_bps: u32,
	pub overswap_tolerance_bps: u32,
	pub underswap_tolerance_bps: u32,
	pub source_timeout_ms: u64,
}

impl Default for Tuning {
	fn default() -> Self {
		Self {
			interest_buffer_bps: DEFAULT_INTEREST_BUFFER_BPS,
			overswap_tolerance_bps: DEFAULT_OVERSWAP_TOLERANCE_BPS,
			underswap_tolerance_bps: DEFAULT_UNDERSWAP_TOLERANCE_BPS,
			source_timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
		}
	}
}

/// Read-only dependencies shared by all strategy instances
#[derive(Clone)]
pub struct StrategyDeps {
	pub tokens: Arc<dyn TokenLookup>,
	pub contracts: ContractBook,
	pub chain_reader: Arc<dyn ChainReader>,
	pub sources: SourceRegistry,
	pub uniswap: Option<Arc<dyn UniswapRouter>>,
	pub tuning: Tuning,
}

impl StrategyDeps {
	pub fn new(
		tokens: Arc<dyn TokenLookup>,
		contracts: ContractBook,
		chain_reader: Arc<dyn ChainReader>,
		sources: SourceRegistry,
	) -> Self {
		Self {
			tokens,
			contracts,
			chain_reader,
			sources,
			uniswap: None,
			tuning: Tuning::default(),
		}
	}

	pub fn with_uniswap(mut self, uniswap: Arc<dyn UniswapRouter>) -> Self {
		self.uniswap = Some(uniswap);
		self
	}

	pub fn with_tuning(mut self, tuning: Tuning) -> Self {
		self.tuning = tuning;
		self
	}

	pub fn verifier(&self, chain_id: u64) -> StrategyResult<Address> {
		self.contracts
			.verifier(chain_id)
			.ok_or(StrategyError::MissingContract {
				chain_id,
				contract: "verifier",
			})
	}
}

impl fmt::Debug for StrategyDeps {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StrategyDeps")
			.field("contracts", &self.contracts)
			.field("sources", &self.sources.ids())
			.field("uniswap", &self.uniswap.is_some())
			.field("tuning", &self.tuning)
			.finish()
	}
}
