//! Target-debt swap combining an underswapped exact input with a Uniswap
//! exact-output remainder

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use swap_composer::{
	apply_slippage, assemble, build_verify_debt_max, estimate_amount_from, Amounts, SwapItem,
};
use swap_types::{Pipeline, RouteItem, SwapRequest, SwapResult, SwapperMode};
use tracing::{debug, info};

use super::exact_in_into_swapper;
use crate::deps::StrategyDeps;
use crate::errors::{StrategyError, StrategyResult};
use crate::helpers::{parse_config, route_inner};
use crate::search::{search, underswap_band};
use crate::sources::uniswap::PROTOCOL as UNISWAP_PROTOCOL;
use crate::sources::UniswapRouter;
use crate::traits::Strategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedUniswapConfig {
	#[serde(alias = "chainsSupported")]
	pub chains: Vec<u64>,
}

impl Default for CombinedUniswapConfig {
	fn default() -> Self {
		Self {
			chains: vec![1, 42161, 10, 137, 8453, 56, 42220, 81457, 324, 7777777, 480],
		}
	}
}

pub struct CombinedUniswapStrategy {
	config: CombinedUniswapConfig,
	uniswap: Option<Arc<dyn UniswapRouter>>,
	deps: StrategyDeps,
}

impl CombinedUniswapStrategy {
	pub const ID: &'static str = "combined_uniswap";

	pub fn new(config: CombinedUniswapConfig, deps: StrategyDeps) -> Self {
		Self {
			config,
			uniswap: deps.uniswap.clone(),
			deps,
		}
	}

	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: CombinedUniswapConfig = parse_config(Self::ID, config)?;
		Ok(Self::new(config, deps.clone()))
	}

	/// Best exact-input quote of the inner pipeline
	async fn inner_quote(
		pipeline: &dyn Pipeline,
		request: SwapRequest,
	) -> StrategyResult<SwapResult> {
		route_inner(pipeline, request, &[Self::ID])
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| StrategyError::quote_not_found("inner pipeline returned no quote"))
	}
}

#[async_trait]
impl Strategy for CombinedUniswapStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		request.mode == SwapperMode::TargetDebt
			&& self.config.chains.contains(&request.chain_id)
			&& self
				.uniswap
				.as_ref()
				.is_some_and(|uniswap| uniswap.supports_chain(request.chain_id))
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let Some(uniswap) = self.uniswap.as_ref() else {
			return Ok(Vec::new());
		};
		let verifier = self.deps.verifier(request.chain_id)?;
		let exact_in = exact_in_into_swapper(request);

		let unit = match Self::inner_quote(pipeline, exact_in.clone().with_amount(request.token_in.unit())).await {
			Ok(unit) => unit,
			Err(StrategyError::QuoteNotFound { .. }) => return Ok(Vec::new()),
			Err(e) => return Err(e),
		};
		if unit.amount_out.is_zero() {
			return Ok(Vec::new());
		}

		// Stay under the target so the remainder is bought exactly
		let target = apply_slippage(request.amount, request.slippage_bps, false)?;
		if target.is_zero() {
			return Ok(Vec::new());
		}
		let initial_from = estimate_amount_from(
			unit.amount_out,
			request.amount,
			request.token_in.decimals,
			request.token_out.decimals,
		)?;

		let exact_in = &exact_in;
		let outcome = search(
			target,
			initial_from,
			|amount_from| async move {
				let quote = Self::inner_quote(pipeline, exact_in.clone().with_amount(amount_from)).await?;
				let amount_to = quote.amount_out;
				Ok((quote, amount_to))
			},
			underswap_band(target, self.deps.tuning.underswap_tolerance_bps),
		)
		.await?;
		let partial = outcome.quote;
		info!(
			"Underswap converged after {} iterations: in={} out={}",
			outcome.iterations, partial.amount_in, partial.amount_out
		);

		let remainder_request = request
			.clone()
			.with_amount(request.amount.saturating_sub(partial.amount_out))
			.with_receiver(request.from);
		let remainder = uniswap.route_exact_out(&remainder_request).await?;
		debug!(
			"Uniswap {} remainder: in={} out={}",
			remainder.handler.name(),
			remainder.amount_in,
			remainder.amount_out
		);

		let mut items = partial.swap.multicall_items;
		items.push(SwapItem::for_request(request, remainder.handler, remainder.path).encode());

		let verify = build_verify_debt_max(
			verifier,
			request.receiver,
			request.account_out,
			request.target_debt,
			request.deadline,
		);
		let amount_in = partial.amount_in + remainder.amount_in;
		let amount_in_max = apply_slippage(amount_in, request.slippage_bps, true)?;

		let mut route = partial.route;
		route.push(RouteItem::new(UNISWAP_PROTOCOL));

		Ok(vec![assemble(
			request,
			Amounts::new(amount_in, amount_in_max, request.amount, request.amount),
			items,
			verify,
			route,
		)])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{deps_with, exact_in_result, ScriptedPipeline, StaticUniswapRouter};
	use swap_types::test_utils::{usdc, weth, SwapRequestBuilder};
	use swap_types::{RoutingEntry, U256};

	fn strategy(uniswap: &StaticUniswapRouter) -> CombinedUniswapStrategy {
		let deps = deps_with(vec![usdc(), weth()], vec![]).with_uniswap(Arc::new(uniswap.clone()));
		CombinedUniswapStrategy::from_config(&deps, None).unwrap()
	}

	/// Inner pipeline selling at 1:1
	fn linear_pipeline() -> ScriptedPipeline {
		ScriptedPipeline::new(
			vec![RoutingEntry::new("combined_uniswap"), RoutingEntry::new("multi_source")],
			|inner| {
				let amount_out = inner.amount.to::<u64>();
				Ok(vec![exact_in_result(inner, amount_out, "Inner")])
			},
		)
	}

	fn request() -> SwapRequest {
		SwapRequestBuilder::new()
			.mode(SwapperMode::TargetDebt)
			.amount(1_000_000)
			.target_debt(0)
			.slippage_bps(100)
			.build()
	}

	#[tokio::test]
	async fn test_combines_partial_swap_with_uniswap_remainder() {
		let uniswap = StaticUniswapRouter::new(1, 1);
		let strategy = strategy(&uniswap);
		let request = request();
		assert!(strategy.supports(&request));

		let pipeline = linear_pipeline();
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		let result = &results[0];

		assert_eq!(result.amount_out, request.amount);
		assert_eq!(result.amount_out_min, request.amount);
		assert_eq!(result.amount_in, U256::from(1_000_000u64));
		assert_eq!(result.route_labels(), vec!["Inner", "Uniswap"]);
		assert_eq!(uniswap.call_count(), 1);

		let last = SwapItem::decode(result.swap.multicall_items.last().unwrap()).unwrap();
		assert_eq!(last.mode, SwapperMode::TargetDebt);
		assert_eq!(last.receiver, request.receiver);
		assert_eq!(last.handler, swap_composer::Handler::UniswapV3.id());

		let seen = pipeline.seen();
		assert!(seen.iter().all(|inner| inner.mode == SwapperMode::ExactIn));
		assert!(seen.iter().all(|inner| inner.receiver == request.from));
	}

	#[tokio::test]
	async fn test_no_inner_quote_is_no_route() {
		let uniswap = StaticUniswapRouter::new(1, 1);
		let strategy = strategy(&uniswap);
		let results = strategy
			.find_swap(&request(), &ScriptedPipeline::empty())
			.await
			.unwrap();
		assert!(results.is_empty());
		assert_eq!(uniswap.call_count(), 0);
	}

	#[test]
	fn test_requires_uniswap_router() {
		let deps = deps_with(vec![], vec![]);
		let strategy = CombinedUniswapStrategy::from_config(&deps, None).unwrap();
		assert!(!strategy.supports(&request()));
	}
}
