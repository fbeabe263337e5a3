//! Per-chain routing tables
//!
//! Loaded once at startup from a JSON document keyed by chain id and
//! validated against the strategy registry, so that unknown strategy ids,
//! unparseable strategy configs and duplicate entries fail fast.

use std::collections::HashMap;
use std::path::Path;

use swap_strategies::StrategyRegistry;
use swap_types::{RouterError, RoutingConfig};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RoutingTableError {
	#[error("Failed to read routing table {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse routing table: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("Chain {chain_id}: unknown strategy '{strategy}'")]
	UnknownStrategy { chain_id: u64, strategy: String },

	#[error("Chain {chain_id}: duplicate routing entry '{strategy}' at position {position}")]
	DuplicateEntry {
		chain_id: u64,
		strategy: String,
		position: usize,
	},

	#[error("Chain {chain_id}: invalid config for '{strategy}': {reason}")]
	InvalidConfig {
		chain_id: u64,
		strategy: String,
		reason: String,
	},
}

/// Static routing configuration of every supported chain
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
	chains: HashMap<u64, RoutingConfig>,
}

impl RoutingTable {
	pub fn new(chains: HashMap<u64, RoutingConfig>) -> Self {
		Self { chains }
	}

	pub fn with_chain(mut self, chain_id: u64, routing: RoutingConfig) -> Self {
		self.chains.insert(chain_id, routing);
		self
	}

	pub fn from_json(raw: &str) -> Result<Self, RoutingTableError> {
		let chains: HashMap<u64, RoutingConfig> = serde_json::from_str(raw)?;
		Ok(Self::new(chains))
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, RoutingTableError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|source| RoutingTableError::Io {
			path: path.display().to_string(),
			source,
		})?;
		let table = Self::from_json(&raw)?;
		info!(
			"Loaded routing table from {} for {} chains",
			path.display(),
			table.chains.len()
		);
		Ok(table)
	}

	pub fn get(&self, chain_id: u64) -> Option<&RoutingConfig> {
		self.chains.get(&chain_id)
	}

	/// Configured chain ids, sorted
	pub fn chain_ids(&self) -> Vec<u64> {
		let mut ids: Vec<u64> = self.chains.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	/// Check every chain's entries against the registry
	pub fn validate(&self, registry: &StrategyRegistry) -> Result<(), RoutingTableError> {
		for chain_id in self.chain_ids() {
			if let Some(routing) = self.chains.get(&chain_id) {
				validate_routing(chain_id, routing, registry)?;
			}
		}
		Ok(())
	}
}

/// Validate one routing list: ids must be registered, configs must build,
/// and no entry may repeat an earlier one
pub fn validate_routing(
	chain_id: u64,
	routing: &RoutingConfig,
	registry: &StrategyRegistry,
) -> Result<(), RoutingTableError> {
	for (position, entry) in routing.iter().enumerate() {
		if !registry.contains(&entry.strategy) {
			return Err(RoutingTableError::UnknownStrategy {
				chain_id,
				strategy: entry.strategy.clone(),
			});
		}
		if routing[..position].contains(entry) {
			return Err(RoutingTableError::DuplicateEntry {
				chain_id,
				strategy: entry.strategy.clone(),
				position,
			});
		}
		registry
			.create(entry)
			.map_err(|e| RoutingTableError::InvalidConfig {
				chain_id,
				strategy: entry.strategy.clone(),
				reason: e.to_string(),
			})?;
	}
	Ok(())
}

impl From<RoutingTableError> for RouterError {
	fn from(error: RoutingTableError) -> Self {
		match error {
			RoutingTableError::UnknownStrategy { strategy, .. } => {
				RouterError::UnknownStrategy { strategy }
			},
			other => RouterError::invalid(other.to_string()),
		}
	}
}
