//! Target-debt wrapper redirecting overswapped output
//!
//! For configured debt vaults, the inner target-debt swap is turned into an
//! exact-input swap into the swapper followed by an explicit repay, so the
//! excess can be deposited into the asset's dust vault instead of the debt
//! vault.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use swap_composer::items::{deposit_item, repay_item};
use swap_composer::{assemble, build_verify_debt_max, Amounts, SwapItem};
use swap_types::constants::limits::DUST_DEPOSIT_AMOUNT;
use swap_types::{address, MulticallItem, Pipeline, SwapRequest, SwapResult, SwapperMode, U256};

use super::{residual_debt_bound, CombinedUniswapStrategy, WrappedVault};
use crate::deps::StrategyDeps;
use crate::errors::StrategyResult;
use crate::helpers::{parse_config, route_inner};
use crate::traits::Strategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDepositConfig {
	#[serde(alias = "supportedVaults")]
	pub vaults: Vec<WrappedVault>,
}

impl Default for RedirectDepositConfig {
	fn default() -> Self {
		Self {
			vaults: vec![WrappedVault::new(
				1,
				address!("d001f0a15D272542687b2677BA627f48A4333b5d"),
				address!("73A15FeD60Bf67631dC6cd7Bc5B6e8da8190aCF5"),
				address!("B0465546E8D70E667d4a187F66eF959B1522cc77"),
				"",
			)],
		}
	}
}

pub struct RedirectDepositWrapperStrategy {
	config: RedirectDepositConfig,
	deps: StrategyDeps,
}

impl RedirectDepositWrapperStrategy {
	pub const ID: &'static str = "redirect_deposit_wrapper";

	pub fn new(config: RedirectDepositConfig, deps: StrategyDeps) -> Self {
		Self { config, deps }
	}

	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: RedirectDepositConfig = parse_config(Self::ID, config)?;
		Ok(Self::new(config, deps.clone()))
	}

	fn vault(&self, request: &SwapRequest) -> Option<&WrappedVault> {
		self.config
			.vaults
			.iter()
			.find(|v| v.chain_id == request.chain_id && v.vault == request.receiver)
	}

	/// Split every target-debt swap into swap, repay and dust deposit
	fn redirect_items(request: &SwapRequest, vault: &WrappedVault, items: Vec<MulticallItem>) -> Vec<MulticallItem> {
		// MAX repays the whole debt; MAX - 1 repays with the swapper balance
		let repay_amount = if request.target_debt.is_zero() {
			U256::MAX
		} else {
			U256::MAX - U256::from(1u64)
		};

		items
			.into_iter()
			.flat_map(|item| match SwapItem::decode(&item) {
				Some(swap) if swap.mode == SwapperMode::TargetDebt => vec![
					swap.with_mode(SwapperMode::ExactIn).encode(),
					repay_item(vault.asset, request.receiver, repay_amount, request.account_out),
					deposit_item(
						vault.asset,
						vault.dust_vault,
						U256::from(DUST_DEPOSIT_AMOUNT),
						request.account_out,
					),
				],
				_ => vec![item],
			})
			.collect()
	}
}

#[async_trait]
impl Strategy for RedirectDepositWrapperStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		request.mode == SwapperMode::TargetDebt && self.vault(request).is_some()
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let Some(vault) = self.vault(request) else {
			return Ok(Vec::new());
		};
		let verifier = self.deps.verifier(request.chain_id)?;

		let inner_request = request.clone().with_receiver(request.from);
		let inner = route_inner(
			pipeline,
			inner_request,
			&[Self::ID, CombinedUniswapStrategy::ID],
		)
		.await?;

		inner
			.into_iter()
			.map(|result| {
				let items = Self::redirect_items(request, vault, result.swap.multicall_items);
				let debt_max = residual_debt_bound(request, result.amount_out_min, &self.deps.tuning)?;
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
						result.amount_in,
						result.amount_in_max,
						result.amount_out,
						result.amount_out_min,
					),
					items,
					verify,
					result.route,
				))
			})
			.collect()
	}
}
