//! Shared plumbing for strategy implementations

use serde::de::DeserializeOwned;
use serde_json::Value;
use swap_types::{
	Address, Pipeline, RoutingConfig, SwapRequest, SwapResult, TokenInfo, TokenLookup,
};
use tracing::debug;

use crate::errors::{StrategyError, StrategyResult};

/// Deserialize an entry's `config`, falling back to the default when absent
pub fn parse_config<T>(strategy: &str, config: Option<&Value>) -> StrategyResult<T>
where
	T: DeserializeOwned + Default,
{
	match config {
		None | Some(Value::Null) => Ok(T::default()),
		Some(value) => serde_json::from_value(value.clone())
			.map_err(|e| StrategyError::invalid_config(strategy, e.to_string())),
	}
}

/// Routing list of the request with the named strategies removed
pub fn narrow_routing(
	pipeline: &dyn Pipeline,
	request: &SwapRequest,
	exclude: &[&str],
) -> StrategyResult<RoutingConfig> {
	let routing = pipeline.resolve_routing(request)?;
	Ok(routing
		.into_iter()
		.filter(|entry| !exclude.contains(&entry.strategy.as_str()))
		.collect())
}

/// Run a derived request through the pipeline with a narrowed routing list.
///
/// Inner "no route" failures and an empty narrowed list are reported as an
/// empty result set.
pub async fn route_inner(
	pipeline: &dyn Pipeline,
	request: SwapRequest,
	exclude: &[&str],
) -> StrategyResult<Vec<SwapResult>> {
	let routing = narrow_routing(pipeline, &request, exclude)?;
	if routing.is_empty() {
		debug!("No routing entries left after excluding {:?}", exclude);
		return Ok(Vec::new());
	}

	match pipeline.route(&request.with_routing(routing).nested()).await {
		Ok(results) => Ok(results),
		Err(e) if e.is_no_route() => {
			debug!("Inner pipeline found no route: {}", e);
			Ok(Vec::new())
		},
		Err(e) => Err(e.into()),
	}
}

/// Token of the request's chain, `QuoteNotFound` when unlisted
pub fn find_token(
	tokens: &dyn TokenLookup,
	chain_id: u64,
	address: Address,
) -> StrategyResult<TokenInfo> {
	tokens.find_token(chain_id, address).ok_or_else(|| {
		StrategyError::quote_not_found(format!("token {} not listed on chain {}", address, chain_id))
	})
}

/// Results ordered by output amount, best first
pub fn sort_by_amount_out(mut results: Vec<SwapResult>) -> Vec<SwapResult> {
	results.sort_by(|a, b| b.amount_out.cmp(&a.amount_out));
	results
}
