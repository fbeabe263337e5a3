//! Routing pipeline
//!
//! Evaluates a request against its ordered routing entries and returns the
//! results of the first entry that matches, supports the request and finds
//! at least one swap. Wrapper strategies re-enter the same router through
//! the `Pipeline` trait with a narrowed routing override.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use swap_strategies::StrategyRegistry;
use swap_types::constants::limits::{
	DEFAULT_ENTRY_TIMEOUT_MS, DEFAULT_MAX_ROUTING_DEPTH, MAX_SEARCH_ITERATIONS,
};
use swap_types::routing::describe;
use swap_types::{
	Pipeline, RouterError, RoutingConfig, StrategyOutcome, SwapRequest, SwapResult,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::route_filter::{RouteFilter, RouteFilterTrait};
use crate::routing_table::RoutingTable;

/// Limits applied to every pipeline traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterLimits {
	pub entry_timeout_ms: u64,
	pub max_depth: u32,
}

impl Default for RouterLimits {
	fn default() -> Self {
		Self {
			entry_timeout_ms: DEFAULT_ENTRY_TIMEOUT_MS,
			max_depth: DEFAULT_MAX_ROUTING_DEPTH,
		}
	}
}

/// The routing pipeline
pub struct Router {
	table: Arc<RoutingTable>,
	registry: StrategyRegistry,
	filter: Arc<dyn RouteFilterTrait>,
	limits: RouterLimits,
}

impl Router {
	pub fn new(table: Arc<RoutingTable>, registry: StrategyRegistry) -> Self {
		Self {
			table,
			registry,
			filter: Arc::new(RouteFilter),
			limits: RouterLimits::default(),
		}
	}

	pub fn with_filter(mut self, filter: Arc<dyn RouteFilterTrait>) -> Self {
		self.filter = filter;
		self
	}

	pub fn with_limits(mut self, limits: RouterLimits) -> Self {
		self.limits = limits;
		self
	}

	pub fn registry(&self) -> &StrategyRegistry {
		&self.registry
	}

	pub fn table(&self) -> &RoutingTable {
		&self.table
	}

	/// Time budget of the next entry, capped by what is left of the request
	/// deadline. Nested traversals run inside an outer entry's budget, so each
	/// level gets the entry timeout divided by `depth + 1`; an inner entry that
	/// times out still leaves the wrapper time to try the next one.
	fn entry_budget(&self, request: &SwapRequest) -> Result<Duration, RouterError> {
		let entry_timeout =
			Duration::from_millis(self.limits.entry_timeout_ms) / request.depth.saturating_add(1);
		match request.remaining() {
			Some(left) if left.is_zero() => Err(self.deadline_exceeded(request)),
			Some(left) => Ok(entry_timeout.min(left)),
			None => Ok(entry_timeout),
		}
	}

	fn deadline_exceeded(&self, request: &SwapRequest) -> RouterError {
		warn!("Request deadline exceeded: {}", describe(request));
		RouterError::DeadlineExceeded {
			timeout_ms: self.limits.entry_timeout_ms,
		}
	}

	async fn run(&self, request: &SwapRequest, routing: RoutingConfig) -> Result<Vec<SwapResult>, RouterError> {
		let mut trace = Vec::with_capacity(routing.len());
		let mut convergence_exceeded = false;

		for entry in &routing {
			if !self.filter.matches(&entry.filter, request) {
				trace.push(StrategyOutcome::unmatched(&entry.strategy));
				continue;
			}

			let strategy = match self.registry.create(entry) {
				Ok(strategy) => strategy,
				Err(e) => {
					warn!("Failed to build strategy {}: {}", entry.strategy, e);
					trace.push(StrategyOutcome::failed(&entry.strategy, e));
					continue;
				},
			};

			if !strategy.supports(request) {
				trace.push(StrategyOutcome::unsupported(&entry.strategy));
				continue;
			}

			let budget = self.entry_budget(request)?;
			debug!(
				"Trying {} with {}ms budget: {}",
				entry.strategy,
				budget.as_millis(),
				describe(request)
			);

			match timeout(budget, strategy.find_swap(request, self)).await {
				Ok(Ok(results)) if !results.is_empty() => {
					info!(
						"Strategy {} found {} swaps at depth {}",
						entry.strategy,
						results.len(),
						request.depth
					);
					return Ok(results);
				},
				Ok(Ok(_)) => {
					debug!("Strategy {} found no route", entry.strategy);
					trace.push(StrategyOutcome::completed(&entry.strategy, Vec::new()));
				},
				Ok(Err(e)) => {
					warn!("Strategy {} failed: {}", entry.strategy, e);
					convergence_exceeded |= e.is_convergence_exceeded();
					trace.push(StrategyOutcome::failed(&entry.strategy, e));
				},
				Err(_) => {
					if request.is_expired() {
						return Err(self.deadline_exceeded(request));
					}
					warn!(
						"Strategy {} timed out after {}ms",
						entry.strategy,
						budget.as_millis()
					);
					trace.push(StrategyOutcome::failed(
						&entry.strategy,
						format!("timeout after {}ms", budget.as_millis()),
					));
				},
			}
		}

		if convergence_exceeded {
			return Err(RouterError::ConvergenceExceeded {
				iterations: MAX_SEARCH_ITERATIONS,
			});
		}

		debug!("Routing exhausted for {}: {:?}", describe(request), trace);
		if trace.iter().any(StrategyOutcome::attempted) {
			Err(RouterError::QuoteNotFound { trace })
		} else {
			Err(RouterError::NotSupported { trace })
		}
	}
}

#[async_trait]
impl Pipeline for Router {
	async fn route(&self, request: &SwapRequest) -> Result<Vec<SwapResult>, RouterError> {
		if request.depth > self.limits.max_depth {
			warn!("Routing depth {} over limit: {}", request.depth, describe(request));
			return Err(RouterError::RecursionLimit {
				max_depth: self.limits.max_depth,
			});
		}
		if request.is_expired() {
			return Err(self.deadline_exceeded(request));
		}

		let routing = self.resolve_routing(request)?;
		self.run(request, routing).await
	}

	fn resolve_routing(&self, request: &SwapRequest) -> Result<RoutingConfig, RouterError> {
		if let Some(routing) = &request.routing_override {
			return Ok(routing.clone());
		}
		self.table
			.get(request.chain_id)
			.cloned()
			.ok_or(RouterError::ConfigMissing {
				chain_id: request.chain_id,
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::route_filter::MockRouteFilterTrait;
	use serde_json::json;
	use std::time::Instant;
	use swap_strategies::test_utils::{deps_with, test_deps, StaticQuoteSource};
	use swap_strategies::registry::constructor;
	use swap_strategies::{QuoteSource, Strategy, StrategyDeps, StrategyError, StrategyResult};
	use swap_types::test_utils::{sample_request, usdc, weth, SwapRequestBuilder};
	use swap_types::{MatchFilter, RoutingEntry, SwapperMode, U256};

	fn single(source: &str) -> RoutingEntry {
		RoutingEntry::new("single_source").with_config(json!({ "source": source }))
	}

	fn router_with(sources: Vec<Arc<dyn QuoteSource>>, routing: RoutingConfig) -> Router {
		let deps = deps_with(vec![usdc(), weth()], sources);
		let table = RoutingTable::default().with_chain(1, routing);
		Router::new(Arc::new(table), StrategyRegistry::with_defaults(deps))
	}

	/// Strategy that always fails with the given error
	struct FailingStrategy(fn() -> StrategyError);

	#[async_trait]
	impl Strategy for FailingStrategy {
		fn id(&self) -> &str {
			"failing"
		}

		fn supports(&self, _request: &SwapRequest) -> bool {
			true
		}

		async fn find_swap(&self, _request: &SwapRequest, _pipeline: &dyn Pipeline) -> StrategyResult<Vec<SwapResult>> {
			Err((self.0)())
		}
	}

	#[tokio::test]
	async fn test_first_successful_entry_wins() {
		let first = StaticQuoteSource::new("first", 200);
		let second = StaticQuoteSource::new("second", 300);
		let router = router_with(
			vec![Arc::new(first.clone()), Arc::new(second.clone())],
			vec![single("first"), single("second")],
		);

		let results = router.route(&sample_request()).await.unwrap();
		assert_eq!(results.len(), 1);
		assert_eq!(results[0].amount_out, U256::from(200u64));
		assert_eq!(first.call_count(), 1);
		assert_eq!(second.call_count(), 0);
	}

	#[tokio::test]
	async fn test_failed_entry_falls_through() {
		let broken = StaticQuoteSource::new("broken", 200).failing();
		let backup = StaticQuoteSource::new("backup", 150);
		let router = router_with(
			vec![Arc::new(broken.clone()), Arc::new(backup.clone())],
			vec![single("broken"), single("backup")],
		);

		let results = router.route(&sample_request()).await.unwrap();
		assert_eq!(results[0].route_labels(), vec!["backup"]);
		assert_eq!(broken.call_count(), 1);
	}

	#[tokio::test]
	async fn test_unmatched_entries_are_skipped() {
		let source = StaticQuoteSource::new("1inch", 200);
		let routing = vec![
			single("1inch").with_filter(MatchFilter::modes(&[SwapperMode::TargetDebt])),
			single("1inch"),
		];
		let router = router_with(vec![Arc::new(source.clone())], routing);

		assert!(router.route(&sample_request()).await.is_ok());
		assert_eq!(source.call_count(), 1);
	}

	#[tokio::test]
	async fn test_config_missing_without_override() {
		let router = router_with(vec![], vec![]);
		let request = SwapRequestBuilder::new().chain_id(10).build();
		assert!(matches!(
			router.route(&request).await,
			Err(RouterError::ConfigMissing { chain_id: 10 })
		));
	}

	#[tokio::test]
	async fn test_override_takes_precedence() {
		let source = StaticQuoteSource::new("1inch", 200);
		let router = router_with(vec![Arc::new(source)], vec![]);
		let request = SwapRequestBuilder::new()
			.chain_id(1)
			.routing(vec![single("1inch")])
			.build();
		assert_eq!(router.route(&request).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_not_supported_when_nothing_matched() {
		let router = router_with(
			vec![],
			vec![single("1inch").with_filter(MatchFilter::modes(&[SwapperMode::ExactOut]))],
		);
		let error = router.route(&sample_request()).await.unwrap_err();
		assert!(matches!(error, RouterError::NotSupported { .. }));
		assert_eq!(error.trace().map(|t| t.len()), Some(1));
	}

	#[tokio::test]
	async fn test_quote_not_found_when_attempted_entries_fail() {
		let broken = StaticQuoteSource::new("1inch", 200).failing();
		let router = router_with(vec![Arc::new(broken)], vec![single("1inch")]);
		let error = router.route(&sample_request()).await.unwrap_err();
		assert!(matches!(error, RouterError::QuoteNotFound { .. }));
		assert_eq!(error.status_code(), 404);
	}

	#[tokio::test]
	async fn test_wrapper_only_override_terminates() {
		let router = router_with(vec![], vec![]);
		let request = SwapRequestBuilder::new()
			.repay(true)
			.routing(vec![RoutingEntry::new("repay_wrapper")])
			.build();
		let error = router.route(&request).await.unwrap_err();
		assert!(error.is_no_route());
	}

	#[tokio::test]
	async fn test_convergence_failure_surfaces() {
		let deps = test_deps();
		let mut registry = StrategyRegistry::with_defaults(deps);
		registry.register(
			"failing",
			constructor(|_: &StrategyDeps, _: Option<&serde_json::Value>| {
				Ok(FailingStrategy(|| StrategyError::ConvergenceExceeded { iterations: 15 }))
			}),
		);
		let table = RoutingTable::default().with_chain(1, vec![RoutingEntry::new("failing")]);
		let router = Router::new(Arc::new(table), registry);

		assert!(matches!(
			router.route(&sample_request()).await,
			Err(RouterError::ConvergenceExceeded { iterations: 15 })
		));
	}

	#[tokio::test]
	async fn test_depth_guard() {
		let router = router_with(vec![], vec![single("1inch")]).with_limits(RouterLimits {
			max_depth: 2,
			..Default::default()
		});
		let request = sample_request().nested().nested().nested();
		assert!(matches!(
			router.route(&request).await,
			Err(RouterError::RecursionLimit { max_depth: 2 })
		));
	}

	#[tokio::test]
	async fn test_slow_entry_times_out_and_falls_through() {
		let slow = StaticQuoteSource::new("slow", 300).with_delay_ms(500);
		let fast = StaticQuoteSource::new("fast", 200);
		let router = router_with(
			vec![Arc::new(slow), Arc::new(fast)],
			vec![single("slow"), single("fast")],
		)
		.with_limits(RouterLimits {
			entry_timeout_ms: 50,
			..Default::default()
		});

		let results = router.route(&sample_request()).await.unwrap();
		assert_eq!(results[0].route_labels(), vec!["fast"]);
	}

	#[tokio::test]
	async fn test_nested_slow_entry_leaves_wrapper_time_to_fall_through() {
		let slow = StaticQuoteSource::new("slow", 300).with_delay_ms(1_000);
		let fast = StaticQuoteSource::new("fast", 200).with_delay_ms(10);
		let router = router_with(
			vec![Arc::new(slow), Arc::new(fast.clone())],
			vec![RoutingEntry::new("repay_wrapper"), single("slow"), single("fast")],
		)
		.with_limits(RouterLimits {
			entry_timeout_ms: 200,
			..Default::default()
		});
		let request = SwapRequestBuilder::new()
			.amount(100)
			.current_debt(1_200)
			.repay(true)
			.build();

		let results = router.route(&request).await.unwrap();
		assert_eq!(results[0].route_labels(), vec!["fast"]);
		assert_eq!(fast.call_count(), 1);
	}

	#[test]
	fn test_entry_budget_shrinks_with_depth() {
		let router = router_with(vec![], vec![]).with_limits(RouterLimits {
			entry_timeout_ms: 300,
			..Default::default()
		});
		let request = sample_request();
		assert_eq!(router.entry_budget(&request).unwrap(), Duration::from_millis(300));
		let inner = request.nested();
		assert_eq!(router.entry_budget(&inner).unwrap(), Duration::from_millis(150));
		assert_eq!(router.entry_budget(&inner.nested()).unwrap(), Duration::from_millis(100));
	}

	#[tokio::test]
	async fn test_expired_request_fails_with_deadline() {
		let router = router_with(vec![], vec![single("1inch")]);
		let request = sample_request().with_expiry(Instant::now());
		assert!(matches!(
			router.route(&request).await,
			Err(RouterError::DeadlineExceeded { .. })
		));
	}

	#[tokio::test]
	async fn test_filter_is_consulted_per_entry() {
		let mut filter = MockRouteFilterTrait::new();
		filter.expect_matches().times(2).returning(|_, _| false);
		let router = router_with(vec![], vec![single("a"), single("b")]).with_filter(Arc::new(filter));

		let error = router.route(&sample_request()).await.unwrap_err();
		assert!(matches!(error, RouterError::NotSupported { .. }));
	}
}
