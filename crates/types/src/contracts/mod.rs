//! Per-chain execution and verifier contract addresses

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Swapper (execution) and verifier contracts of one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContracts {
	pub swapper: Address,
	pub verifier: Address,
}

/// Contract address book keyed by chain id
#[derive(Debug, Clone, Default)]
pub struct ContractBook {
	chains: HashMap<u64, ChainContracts>,
}

impl ContractBook {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_chain(mut self, chain_id: u64, contracts: ChainContracts) -> Self {
		self.insert(chain_id, contracts);
		self
	}

	pub fn insert(&mut self, chain_id: u64, contracts: ChainContracts) {
		self.chains.insert(chain_id, contracts);
	}

	pub fn get(&self, chain_id: u64) -> Option<&ChainContracts> {
		self.chains.get(&chain_id)
	}

	pub fn swapper(&self, chain_id: u64) -> Option<Address> {
		self.get(chain_id).map(|c| c.swapper)
	}

	pub fn verifier(&self, chain_id: u64) -> Option<Address> {
		self.get(chain_id).map(|c| c.verifier)
	}

	pub fn chain_ids(&self) -> Vec<u64> {
		let mut ids: Vec<u64> = self.chains.keys().copied().collect();
		ids.sort_unstable();
		ids
	}
}
