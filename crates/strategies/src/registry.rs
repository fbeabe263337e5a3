//! Strategy registry
//!
//! Maps strategy ids used in routing tables to constructors building a
//! configured strategy instance.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use swap_types::RoutingEntry;

use crate::deps::StrategyDeps;
use crate::errors::{StrategyError, StrategyResult};
use crate::traits::Strategy;
use crate::variants::{
	CombinedUniswapStrategy, Erc4626WrapperStrategy, MultiSourceStrategy, PendleStrategy,
	RedirectDepositWrapperStrategy, RepayWrapperStrategy, SingleSourceStrategy,
};

/// Builds a strategy from the shared deps and an entry's config
pub type StrategyConstructor =
	Arc<dyn Fn(&StrategyDeps, Option<&Value>) -> StrategyResult<Arc<dyn Strategy>> + Send + Sync>;

/// Erase a typed `from_config` into a registry constructor
pub fn constructor<S, F>(build: F) -> StrategyConstructor
where
	S: Strategy + 'static,
	F: Fn(&StrategyDeps, Option<&Value>) -> StrategyResult<S> + Send + Sync + 'static,
{
	Arc::new(
		move |deps: &StrategyDeps, config: Option<&Value>| -> StrategyResult<Arc<dyn Strategy>> {
			Ok(Arc::new(build(deps, config)?))
		},
	)
}

/// Registry of known strategy ids
#[derive(Clone)]
pub struct StrategyRegistry {
	deps: StrategyDeps,
	constructors: HashMap<String, StrategyConstructor>,
}

impl StrategyRegistry {
	/// Empty registry
	pub fn new(deps: StrategyDeps) -> Self {
		Self {
			deps,
			constructors: HashMap::new(),
		}
	}

	/// Registry with every built-in strategy
	pub fn with_defaults(deps: StrategyDeps) -> Self {
		let mut registry = Self::new(deps);
		registry.register(SingleSourceStrategy::ID, constructor(SingleSourceStrategy::from_config));
		registry.register(MultiSourceStrategy::ID, constructor(MultiSourceStrategy::from_config));
		registry.register(
			CombinedUniswapStrategy::ID,
			constructor(CombinedUniswapStrategy::from_config),
		);
		registry.register(PendleStrategy::ID, constructor(PendleStrategy::from_config));
		registry.register(RepayWrapperStrategy::ID, constructor(RepayWrapperStrategy::from_config));
		registry.register(
			Erc4626WrapperStrategy::ID,
			constructor(Erc4626WrapperStrategy::from_config),
		);
		registry.register(
			RedirectDepositWrapperStrategy::ID,
			constructor(RedirectDepositWrapperStrategy::from_config),
		);
		registry
	}

	pub fn register(&mut self, id: &str, constructor: StrategyConstructor) {
		self.constructors.insert(id.to_string(), constructor);
	}

	pub fn contains(&self, id: &str) -> bool {
		self.constructors.contains_key(id)
	}

	/// Registered ids, sorted
	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.constructors.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn deps(&self) -> &StrategyDeps {
		&self.deps
	}

	/// Build the strategy of a routing entry
	pub fn create(&self, entry: &RoutingEntry) -> StrategyResult<Arc<dyn Strategy>> {
		let constructor = self.constructors.get(&entry.strategy).ok_or_else(|| {
			StrategyError::invalid_config(&entry.strategy, "unknown strategy id")
		})?;
		constructor(&self.deps, entry.config.as_ref())
	}
}

impl std::fmt::Debug for StrategyRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StrategyRegistry")
			.field("strategies", &self.ids())
			.finish()
	}
}
