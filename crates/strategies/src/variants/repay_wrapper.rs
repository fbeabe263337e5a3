//! Exact-input repay wrapper
//!
//! Routes the swap into the swapper, then repays the receiver vault with the
//! whole swapper balance and deposits any excess back for the account.

use async_trait::async_trait;
use serde_json::Value;
use swap_composer::items::repay_and_deposit_item;
use swap_composer::{assemble, build_verify_debt_max, Amounts};
use swap_types::{Pipeline, SwapRequest, SwapResult, U256};
use tracing::debug;

use super::residual_debt_bound;
use crate::deps::StrategyDeps;
use crate::errors::StrategyResult;
use crate::helpers::route_inner;
use crate::traits::Strategy;

pub struct RepayWrapperStrategy {
	deps: StrategyDeps,
}

impl RepayWrapperStrategy {
	pub const ID: &'static str = "repay_wrapper";

	pub fn new(deps: StrategyDeps) -> Self {
		Self { deps }
	}

	pub fn from_config(deps: &StrategyDeps, _config: Option<&Value>) -> StrategyResult<Self> {
		Ok(Self::new(deps.clone()))
	}

	fn wrap(&self, request: &SwapRequest, inner: SwapResult) -> StrategyResult<SwapResult> {
		let verifier = self.deps.verifier(request.chain_id)?;

		let mut items = inner.swap.multicall_items;
		// MAX - 1 repays with the whole swapper balance
		items.push(repay_and_deposit_item(
			request.token_out.address,
			request.receiver,
			U256::MAX - U256::from(1u64),
			request.account_out,
		));

		let debt_max = residual_debt_bound(request, inner.amount_out_min, &self.deps.tuning)?;
		let verify = build_verify_debt_max(
			verifier,
			request.receiver,
			request.account_out,
			debt_max,
			request.deadline,
		);

		Ok(assemble(
			request,
			Amounts::new(
				request.amount,
				request.amount,
				inner.amount_out,
				inner.amount_out_min,
			),
			items,
			verify,
			inner.route,
		))
	}
}

#[async_trait]
impl Strategy for RepayWrapperStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		request.is_exact_in_repay()
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let inner_request = request
			.clone()
			.with_repay(false)
			.with_receiver(request.from);
		let inner = route_inner(pipeline, inner_request, &[Self::ID]).await?;
		debug!("Repay wrapper received {} inner quotes", inner.len());

		inner
			.into_iter()
			.map(|result| self.wrap(request, result))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{exact_in_result, test_deps, ScriptedPipeline};
	use swap_types::test_utils::SwapRequestBuilder;
	use swap_types::{RoutingEntry, VerificationKind};

	fn routing() -> Vec<RoutingEntry> {
		vec![
			RoutingEntry::new("repay_wrapper"),
			RoutingEntry::new("multi_source"),
		]
	}

	#[tokio::test]
	async fn test_wraps_inner_swap_with_repay() {
		let strategy = RepayWrapperStrategy::new(test_deps());
		let request = SwapRequestBuilder::new()
			.amount(100)
			.current_debt(1_200)
			.repay(true)
			.build();
		let pipeline = ScriptedPipeline::new(routing(), |inner| {
			Ok(vec![exact_in_result(inner, 200, "Inner")])
		});

		assert!(strategy.supports(&request));
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		assert_eq!(results.len(), 1);
		let result = &results[0];

		let seen = pipeline.seen();
		assert_eq!(seen[0].receiver, request.from);
		assert!(!seen[0].is_repay);

		let names: Vec<&str> = result
			.swap
			.multicall_items
			.iter()
			.map(|item| item.function_name.as_str())
			.collect();
		assert_eq!(names, vec!["swap", "repayAndDeposit"]);
		assert_eq!(result.amount_out_min, U256::from(199u64));
		assert_eq!(result.receiver, request.receiver);
		assert_eq!(result.verify.kind, VerificationKind::DebtMax);
		// (1200 - 199) * 10001 / 10000
		assert_eq!(result.verify.amount, U256::from(1_001u64));
		assert_eq!(result.route_labels(), vec!["Inner"]);
	}

	#[tokio::test]
	async fn test_no_inner_route_is_empty() {
		let strategy = RepayWrapperStrategy::new(test_deps());
		let request = SwapRequestBuilder::new().repay(true).build();
		let results = strategy
			.find_swap(&request, &ScriptedPipeline::empty())
			.await
			.unwrap();
		assert!(results.is_empty());
	}

	#[test]
	fn test_supports_exact_in_repay_only() {
		let strategy = RepayWrapperStrategy::new(test_deps());
		assert!(!strategy.supports(&SwapRequestBuilder::new().build()));
		assert!(!strategy.supports(
			&SwapRequestBuilder::new()
				.repay(true)
				.mode(swap_types::SwapperMode::TargetDebt)
				.build()
		));
	}
}
