//! ERC4626 wrapper
//!
//! Handles swaps where one side is a configured ERC4626 vault share, by
//! redeeming, withdrawing, depositing or minting through the vault and
//! routing the underlying asset through the pipeline when the other side is
//! a different token.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use swap_composer::items::{
	deposit_item, mint_item, redeem_item, rewrite_swap_modes, withdraw_item,
};
use swap_composer::{
	adjust_for_interest, apply_slippage, assemble, build_verify_debt_max, build_verify_skim_min, Amounts,
};
use swap_types::constants::limits::DUST_DEPOSIT_AMOUNT;
use swap_types::{
	address, Address, Pipeline, RouteItem, SwapRequest, SwapResult, SwapperMode, VerifyPayload, U256,
};
use tracing::debug;

use super::WrappedVault;
use crate::deps::StrategyDeps;
use crate::errors::StrategyResult;
use crate::helpers::{find_token, parse_config, route_inner};
use crate::traits::Strategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc4626WrapperConfig {
	#[serde(alias = "supportedVaults")]
	pub vaults: Vec<WrappedVault>,
}

impl Default for Erc4626WrapperConfig {
	fn default() -> Self {
		let weth_dust = address!("b3b36220fA7d12f7055dab5c9FD18E860e9a6bF8");
		let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
		Self {
			vaults: vec![
				WrappedVault::new(
					1,
					address!("1202f5c7b4b9e47a1a484e8b270be34dbbc75055"),
					address!("66a1E37c9b0eAddca17d3662D6c05F4DECf3e110"),
					address!("3a8992754e2ef51d8f90620d2766278af5c59b90"),
					"wstUSR",
				),
				WrappedVault::new(
					1,
					address!("7751E2F4b8ae93EF6B79d86419d42FE3295A4559"),
					address!("bdC7c08592Ee4aa51D06C27Ee23D5087D65aDbcD"),
					address!("0Fc9cdb39317354a98a1Afa6497a969ff3a6BA9C"),
					"wUSDL",
				),
				WrappedVault::new(
					1,
					address!("657d9aba1dbb59e53f9f3ecaa878447dcfc96dcb"),
					weth,
					weth_dust,
					"ynETHX",
				),
				WrappedVault::new(
					1,
					address!("09db87A538BD693E9d08544577d5cCfAA6373A48"),
					weth,
					weth_dust,
					"ynETH",
				),
				WrappedVault::new(
					146,
					address!("E8a41c62BB4d5863C6eadC96792cFE90A1f37C47"),
					address!("455d5f11Fea33A8fa9D3e285930b478B6bF85265"),
					address!("57056B888527A9ca638CA06f2e194eF73a32CAFC"),
					"wstkscETH",
				),
				WrappedVault::new(
					146,
					address!("9fb76f7ce5FCeAA2C42887ff441D46095E494206"),
					address!("4D85bA8c3918359c78Ed09581E5bc7578ba932ba"),
					address!("911Af5Bf5b7dd0F83869Ba857eDfDC3dea8254C2"),
					"wstkscUSD",
				),
			],
		}
	}
}

/// Which side of the trade the vault share is on
enum VaultSide<'a> {
	/// Selling shares for their asset
	ToUnderlying(&'a WrappedVault),
	/// Selling shares for another token
	ToAny(&'a WrappedVault),
	/// Buying shares with their asset
	FromUnderlying(&'a WrappedVault),
	/// Buying shares with another token
	FromAny(&'a WrappedVault),
}

pub struct Erc4626WrapperStrategy {
	config: Erc4626WrapperConfig,
	deps: StrategyDeps,
}

impl Erc4626WrapperStrategy {
	pub const ID: &'static str = "erc4626_wrapper";

	pub fn new(config: Erc4626WrapperConfig, deps: StrategyDeps) -> Self {
		Self { config, deps }
	}

	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: Erc4626WrapperConfig = parse_config(Self::ID, config)?;
		Ok(Self::new(config, deps.clone()))
	}

	fn vault(&self, chain_id: u64, token: Address) -> Option<&WrappedVault> {
		self.config
			.vaults
			.iter()
			.find(|v| v.chain_id == chain_id && v.vault == token)
	}

	fn side(&self, request: &SwapRequest) -> Option<VaultSide<'_>> {
		if let Some(vault) = self.vault(request.chain_id, request.token_in.address) {
			return Some(if vault.asset == request.token_out.address {
				VaultSide::ToUnderlying(vault)
			} else {
				VaultSide::ToAny(vault)
			});
		}
		self.vault(request.chain_id, request.token_out.address).map(|vault| {
			if vault.asset == request.token_in.address {
				VaultSide::FromUnderlying(vault)
			} else {
				VaultSide::FromAny(vault)
			}
		})
	}

	fn verifier(&self, request: &SwapRequest) -> StrategyResult<Address> {
		self.deps.verifier(request.chain_id)
	}

	fn skim_min(&self, request: &SwapRequest, amount_min: U256) -> StrategyResult<VerifyPayload> {
		Ok(build_verify_skim_min(
			self.verifier(request)?,
			request.receiver,
			request.account_out,
			amount_min,
			request.deadline,
		))
	}

	fn debt_max(&self, request: &SwapRequest) -> StrategyResult<VerifyPayload> {
		Ok(build_verify_debt_max(
			self.verifier(request)?,
			request.receiver,
			request.account_out,
			request.target_debt,
			request.deadline,
		))
	}

	fn buffered(&self, amount: U256) -> StrategyResult<U256> {
		Ok(adjust_for_interest(amount, self.deps.tuning.interest_buffer_bps)?)
	}

	async fn exact_in_to_underlying(&self, request: &SwapRequest, vault: &WrappedVault) -> StrategyResult<Vec<SwapResult>> {
		let assets = self
			.deps
			.chain_reader
			.preview_redeem(request.chain_id, vault.vault, request.amount)
			.await?;
		let items = vec![redeem_item(request, vault.vault, request.amount, assets, request.receiver)];

		let mut result = assemble(
			request,
			Amounts::new(request.amount, request.amount, assets, assets),
			items,
			self.skim_min(request, assets)?,
			vec![RouteItem::new(vault.protocol.clone())],
		);
		result.slippage_bps = 0;
		Ok(vec![result])
	}

	async fn exact_in_to_any(
		&self,
		request: &SwapRequest,
		vault: &WrappedVault,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let assets = self
			.deps
			.chain_reader
			.preview_redeem(request.chain_id, vault.vault, request.amount)
			.await?;
		let redeem = redeem_item(request, vault.vault, request.amount, assets, request.from);

		let asset = find_token(self.deps.tokens.as_ref(), request.chain_id, vault.asset)?;
		let inner_request = request.clone().with_token_in(asset).with_amount(assets);
		let inner = route_inner(pipeline, inner_request, &[Self::ID]).await?;

		Ok(inner
			.into_iter()
			.map(|inner| {
				let mut items = Vec::with_capacity(inner.swap.multicall_items.len() + 2);
				items.push(redeem.clone());
				items.extend(inner.swap.multicall_items);
				// leftover asset would otherwise stay in the swapper
				items.push(deposit_item(
					vault.asset,
					vault.dust_vault,
					U256::from(DUST_DEPOSIT_AMOUNT),
					request.account_out,
				));

				let mut route = vec![RouteItem::new(vault.protocol.clone())];
				route.extend(inner.route);
				assemble(
					request,
					Amounts::new(request.amount, request.amount, inner.amount_out, inner.amount_out_min),
					items,
					inner.verify,
					route,
				)
			})
			.collect())
	}

	async fn exact_in_from_underlying(&self, request: &SwapRequest, vault: &WrappedVault) -> StrategyResult<Vec<SwapResult>> {
		let shares = self
			.deps
			.chain_reader
			.preview_deposit(request.chain_id, vault.vault, request.amount)
			.await?;
		let items = vec![deposit_item(vault.asset, vault.vault, U256::ZERO, request.receiver)];
		// share price can grow before execution
		let shares_min = apply_slippage(shares, request.slippage_bps, false)?;

		Ok(vec![assemble(
			request,
			Amounts::new(request.amount, request.amount, shares, shares_min),
			items,
			self.skim_min(request, shares_min)?,
			vec![RouteItem::new(vault.protocol.clone())],
		)])
	}

	async fn exact_in_from_any(
		&self,
		request: &SwapRequest,
		vault: &WrappedVault,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let asset = find_token(self.deps.tokens.as_ref(), request.chain_id, vault.asset)?;
		let inner_request = request.clone().with_token_out(asset).with_receiver(request.from);
		let inner = route_inner(pipeline, inner_request, &[Self::ID]).await?;

		let mut results = Vec::with_capacity(inner.len());
		for inner in inner {
			let shares = self
				.deps
				.chain_reader
				.preview_deposit(request.chain_id, vault.vault, inner.amount_out)
				.await?;
			let shares_min = self
				.deps
				.chain_reader
				.preview_deposit(request.chain_id, vault.vault, inner.amount_out_min)
				.await?;

			let mut items = inner.swap.multicall_items;
			// deposits the whole swapper balance straight to the receiver
			items.push(deposit_item(vault.asset, vault.vault, U256::ZERO, request.receiver));

			let mut route = vec![RouteItem::new(vault.protocol.clone())];
			route.extend(inner.route);
			results.push(assemble(
				request,
				Amounts::new(request.amount, request.amount, shares, shares_min),
				items,
				self.skim_min(request, shares_min)?,
				route,
			));
		}
		Ok(results)
	}

	async fn target_debt_to_underlying(&self, request: &SwapRequest, vault: &WrappedVault) -> StrategyResult<Vec<SwapResult>> {
		let assets = self.buffered(request.amount)?;
		let shares = self
			.deps
			.chain_reader
			.preview_withdraw(request.chain_id, vault.vault, assets)
			.await?;
		let items = vec![withdraw_item(request, vault.vault, assets, request.from)];

		let mut result = assemble(
			request,
			Amounts::new(shares, shares, assets, assets),
			items,
			self.debt_max(request)?,
			vec![RouteItem::new(vault.protocol.clone())],
		);
		result.slippage_bps = 0;
		Ok(vec![result])
	}

	async fn target_debt_to_any(
		&self,
		request: &SwapRequest,
		vault: &WrappedVault,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let asset = find_token(self.deps.tokens.as_ref(), request.chain_id, vault.asset)?;
		// unused asset goes to the dust vault; fixed input avoids leaving any
		let inner_request = request
			.clone()
			.with_token_in(asset)
			.with_vault_in(vault.dust_vault)
			.with_only_fixed_input_exact_out(true);
		let inner = route_inner(pipeline, inner_request, &[Self::ID]).await?;

		// exact input so the withdraw itself does not repay
		let withdraw_request = request.clone().with_mode(SwapperMode::ExactIn);
		let mut results = Vec::with_capacity(inner.len());
		for inner in inner {
			let shares = self
				.deps
				.chain_reader
				.preview_withdraw(request.chain_id, vault.vault, inner.amount_in)
				.await?;

			let mut items = vec![withdraw_item(
				&withdraw_request,
				vault.vault,
				inner.amount_in,
				request.from,
			)];
			items.extend(inner.swap.multicall_items);

			let mut route = vec![RouteItem::new(vault.protocol.clone())];
			route.extend(inner.route);
			results.push(assemble(
				request,
				Amounts::new(shares, shares, inner.amount_out, inner.amount_out_min),
				items,
				self.debt_max(request)?,
				route,
			));
		}
		Ok(results)
	}

	async fn target_debt_from_underlying(&self, request: &SwapRequest, vault: &WrappedVault) -> StrategyResult<Vec<SwapResult>> {
		let shares = self.buffered(request.amount)?;
		let assets = self
			.deps
			.chain_reader
			.preview_mint(request.chain_id, vault.vault, shares)
			.await?;
		// minted in target-debt mode, so the swapper repays right after
		let items = vec![mint_item(request, vault.vault, shares, request.from)];

		let mut result = assemble(
			request,
			Amounts::new(assets, self.buffered(assets)?, shares, shares),
			items,
			self.debt_max(request)?,
			vec![RouteItem::new(vault.protocol.clone())],
		);
		result.slippage_bps = 0;
		Ok(vec![result])
	}

	async fn target_debt_from_any(
		&self,
		request: &SwapRequest,
		vault: &WrappedVault,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let asset = find_token(self.deps.tokens.as_ref(), request.chain_id, vault.asset)?;
		let shares = self.buffered(request.amount)?;
		let assets = self
			.deps
			.chain_reader
			.preview_mint(request.chain_id, vault.vault, shares)
			.await?;
		let mint_request = request
			.clone()
			.with_token_in(asset.clone())
			.with_vault_in(vault.dust_vault);
		let mint = mint_item(&mint_request, vault.vault, shares, request.from);

		// overswapping the asset covers a growing share price
		let inner_request = request
			.clone()
			.with_amount(assets)
			.with_token_out(asset)
			.with_receiver(request.from)
			.with_only_fixed_input_exact_out(true);
		let inner = route_inner(pipeline, inner_request, &[Self::ID]).await?;

		Ok(inner
			.into_iter()
			.map(|inner| {
				// the mint repays, so the inner swap must not
				let mut items = rewrite_swap_modes(
					inner.swap.multicall_items,
					SwapperMode::TargetDebt,
					SwapperMode::ExactOut,
				);
				items.push(mint.clone());

				let mut route = inner.route;
				route.push(RouteItem::new(vault.protocol.clone()));
				Ok(assemble(
					request,
					Amounts::new(inner.amount_in, inner.amount_in_max, shares, shares),
					items,
					self.debt_max(request)?,
					route,
				))
			})
			.collect::<StrategyResult<Vec<_>>>()?)
	}
}

#[async_trait]
impl Strategy for Erc4626WrapperStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		!request.is_exact_in_repay()
			&& matches!(request.mode, SwapperMode::ExactIn | SwapperMode::TargetDebt)
			&& self.side(request).is_some()
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let Some(side) = self.side(request) else {
			return Ok(Vec::new());
		};

		match (request.mode, side) {
			(SwapperMode::ExactIn, VaultSide::ToUnderlying(vault)) => {
				debug!("Redeeming {} into its asset", vault.protocol);
				self.exact_in_to_underlying(request, vault).await
			},
			(SwapperMode::ExactIn, VaultSide::ToAny(vault)) => {
				self.exact_in_to_any(request, vault, pipeline).await
			},
			(SwapperMode::ExactIn, VaultSide::FromUnderlying(vault)) => {
				debug!("Depositing into {}", vault.protocol);
				self.exact_in_from_underlying(request, vault).await
			},
			(SwapperMode::ExactIn, VaultSide::FromAny(vault)) => {
				self.exact_in_from_any(request, vault, pipeline).await
			},
			(SwapperMode::TargetDebt, VaultSide::ToUnderlying(vault)) => {
				debug!("Withdrawing {} for target debt", vault.protocol);
				self.target_debt_to_underlying(request, vault).await
			},
			(SwapperMode::TargetDebt, VaultSide::ToAny(vault)) => {
				self.target_debt_to_any(request, vault, pipeline).await
			},
			(SwapperMode::TargetDebt, VaultSide::FromUnderlying(vault)) => {
				debug!("Minting {} for target debt", vault.protocol);
				self.target_debt_from_underlying(request, vault).await
			},
			(SwapperMode::TargetDebt, VaultSide::FromAny(vault)) => {
				self.target_debt_from_any(request, vault, pipeline).await
			},
			(SwapperMode::ExactOut, _) => Ok(Vec::new()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chain::MockChainReader;
	use crate::test_utils::{exact_in_result, test_contracts, ScriptedPipeline, StaticChainReader};
	use crate::variants::target_debt_result;
	use crate::{SourceRegistry, StrategyDeps};
	use serde_json::json;
	use std::sync::Arc;
	use swap_composer::SwapItem;
	use swap_types::test_utils::{usdc, SwapRequestBuilder, TEST_VERIFIER, USDC};
	use swap_types::{Bytes, Quote, RoutingEntry, TokenInfo, TokenList, VerificationKind};

	const VAULT: Address = address!("1000000000000000000000000000000000000001");
	const ASSET: Address = address!("2000000000000000000000000000000000000002");
	const DUST: Address = address!("3000000000000000000000000000000000000003");

	fn share() -> TokenInfo {
		TokenInfo::new(1, VAULT, 18, "sASSET")
	}

	fn asset() -> TokenInfo {
		TokenInfo::new(1, ASSET, 18, "ASSET")
	}

	/// One share is worth two assets
	fn strategy() -> Erc4626WrapperStrategy {
		let deps = StrategyDeps::new(
			Arc::new(TokenList::from_tokens([share(), asset(), usdc()])),
			test_contracts(),
			Arc::new(StaticChainReader::new(2, 1)),
			SourceRegistry::new(),
		);
		let config = json!({"supportedVaults": [{
			"chainId": 1,
			"vault": VAULT,
			"asset": ASSET,
			"assetDustEVault": DUST,
			"protocol": "sASSET",
		}]});
		Erc4626WrapperStrategy::from_config(&deps, Some(&config)).unwrap()
	}

	fn pipeline() -> ScriptedPipeline {
		ScriptedPipeline::new(
			vec![RoutingEntry::new("erc4626_wrapper"), RoutingEntry::new("multi_source")],
			|inner| match inner.mode {
				SwapperMode::TargetDebt => {
					let quote = Quote::new(inner.amount, inner.amount, Bytes::from(vec![9]), "Inner");
					let amounts = Amounts::new(inner.amount, inner.amount, inner.amount, inner.amount);
					Ok(vec![target_debt_result(inner, &quote, amounts, TEST_VERIFIER)])
				},
				_ => Ok(vec![exact_in_result(inner, 500, "Inner")]),
			},
		)
	}

	fn names(result: &SwapResult) -> Vec<&str> {
		result
			.swap
			.multicall_items
			.iter()
			.map(|item| item.function_name.as_str())
			.collect()
	}

	#[tokio::test]
	async fn test_exact_in_redeem_to_underlying() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(share())
			.token_out(asset())
			.amount(100)
			.build();

		let results = strategy.find_swap(&request, &pipeline()).await.unwrap();
		let result = &results[0];
		assert_eq!(result.amount_out, U256::from(200u64));
		assert_eq!(result.amount_out_min, U256::from(200u64));
		assert_eq!(result.slippage_bps, 0);
		assert_eq!(result.verify.kind, VerificationKind::SkimMin);
		assert_eq!(result.route_labels(), vec!["sASSET"]);
		assert_eq!(names(result), vec!["swap"]);
	}

	#[tokio::test]
	async fn test_exact_in_redeem_then_swap_with_dust_deposit() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new().token_in(share()).amount(100).build();

		let pipeline = pipeline();
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		let result = &results[0];

		let inner = &pipeline.seen()[0];
		assert_eq!(inner.token_in.address, ASSET);
		assert_eq!(inner.amount, U256::from(200u64));

		assert_eq!(names(result), vec!["swap", "swap", "deposit"]);
		assert_eq!(result.swap.multicall_items[2].args[1], json!(DUST));
		assert_eq!(result.route_labels(), vec!["sASSET", "Inner"]);
		assert_eq!(result.amount_in, U256::from(100u64));
	}

	#[tokio::test]
	async fn test_exact_in_deposit_from_underlying() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(asset())
			.token_out(share())
			.amount(1_000)
			.slippage_bps(100)
			.build();

		let results = strategy.find_swap(&request, &pipeline()).await.unwrap();
		let result = &results[0];
		assert_eq!(result.amount_out, U256::from(500u64));
		assert_eq!(result.amount_out_min, U256::from(495u64));
		assert_eq!(names(result), vec!["deposit"]);
	}

	#[tokio::test]
	async fn test_exact_in_swap_then_deposit() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(usdc())
			.token_out(share())
			.amount(1_000)
			.build();

		let pipeline = pipeline();
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		let result = &results[0];
		assert_eq!(pipeline.seen()[0].token_out.address, ASSET);
		assert_eq!(pipeline.seen()[0].receiver, request.from);
		// inner 500 assets -> 250 shares, min 497 assets -> 248 shares
		assert_eq!(result.amount_out, U256::from(250u64));
		assert_eq!(result.amount_out_min, U256::from(248u64));
		assert_eq!(names(result), vec!["swap", "deposit"]);
		assert_eq!(result.route_labels(), vec!["sASSET", "Inner"]);
	}

	#[tokio::test]
	async fn test_target_debt_withdraw_to_underlying() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(share())
			.token_out(asset())
			.mode(SwapperMode::TargetDebt)
			.amount(100_000)
			.target_debt(7)
			.build();

		let results = strategy.find_swap(&request, &pipeline()).await.unwrap();
		let result = &results[0];
		assert_eq!(result.amount_out, U256::from(100_010u64));
		assert_eq!(result.amount_in, U256::from(50_005u64));
		assert_eq!(result.verify.kind, VerificationKind::DebtMax);
		assert_eq!(result.verify.amount, U256::from(7u64));
		let withdraw = SwapItem::decode(&result.swap.multicall_items[0]).unwrap();
		assert_eq!(withdraw.mode, SwapperMode::TargetDebt);
		assert_eq!(withdraw.amount_out, U256::from(7u64));
	}

	#[tokio::test]
	async fn test_target_debt_withdraw_then_swap() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(share())
			.token_out(usdc())
			.mode(SwapperMode::TargetDebt)
			.amount(1_000)
			.build();

		let pipeline = pipeline();
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		let result = &results[0];

		let inner = &pipeline.seen()[0];
		assert_eq!(inner.vault_in, DUST);
		assert!(inner.only_fixed_input_exact_out);

		let withdraw = SwapItem::decode(&result.swap.multicall_items[0]).unwrap();
		assert_eq!(withdraw.mode, SwapperMode::ExactIn);
		assert_eq!(result.amount_in, U256::from(500u64));
		assert_eq!(names(result), vec!["swap", "swap"]);
	}

	#[tokio::test]
	async fn test_target_debt_withdraw_previews_inner_input() {
		let mut reader = MockChainReader::new();
		reader
			.expect_preview_withdraw()
			.withf(|chain_id, vault, assets| *chain_id == 1 && *vault == VAULT && *assets == U256::from(1_000u64))
			.times(1)
			.returning(|_, _, _| Ok(U256::from(400u64)));
		reader.expect_preview_redeem().never();

		let deps = StrategyDeps::new(
			Arc::new(TokenList::from_tokens([share(), asset(), usdc()])),
			test_contracts(),
			Arc::new(reader),
			SourceRegistry::new(),
		);
		let strategy = Erc4626WrapperStrategy::new(
			Erc4626WrapperConfig {
				vaults: vec![WrappedVault::new(1, VAULT, ASSET, DUST, "sASSET")],
			},
			deps,
		);
		let request = SwapRequestBuilder::new()
			.token_in(share())
			.token_out(usdc())
			.mode(SwapperMode::TargetDebt)
			.amount(1_000)
			.build();

		let results = strategy.find_swap(&request, &pipeline()).await.unwrap();
		assert_eq!(results[0].amount_in, U256::from(400u64));
	}

	#[tokio::test]
	async fn test_target_debt_mint_from_underlying() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(asset())
			.token_out(share())
			.mode(SwapperMode::TargetDebt)
			.amount(100_000)
			.build();

		let results = strategy.find_swap(&request, &pipeline()).await.unwrap();
		let result = &results[0];
		assert_eq!(result.amount_out, U256::from(100_010u64));
		assert_eq!(result.amount_in, U256::from(200_020u64));
		assert_eq!(result.amount_in_max, U256::from(200_040u64));
	}

	#[tokio::test]
	async fn test_target_debt_swap_then_mint() {
		let strategy = strategy();
		let request = SwapRequestBuilder::new()
			.token_in(usdc())
			.token_out(share())
			.mode(SwapperMode::TargetDebt)
			.amount(100_000)
			.build();

		let pipeline = pipeline();
		let results = strategy.find_swap(&request, &pipeline).await.unwrap();
		let result = &results[0];

		let inner = &pipeline.seen()[0];
		assert_eq!(inner.token_out.address, ASSET);
		assert_eq!(inner.amount, U256::from(200_020u64));

		let swap = SwapItem::decode(&result.swap.multicall_items[0]).unwrap();
		assert_eq!(swap.mode, SwapperMode::ExactOut);
		let mint = SwapItem::decode(&result.swap.multicall_items[1]).unwrap();
		assert_eq!(mint.mode, SwapperMode::TargetDebt);
		assert_eq!(mint.token_in, ASSET);
		assert_eq!(mint.vault_in, DUST);
		assert_eq!(result.route_labels(), vec!["Inner", "sASSET"]);
	}

	#[test]
	fn test_supports() {
		let strategy = strategy();
		assert!(strategy.supports(&SwapRequestBuilder::new().token_in(share()).build()));
		assert!(!strategy.supports(&SwapRequestBuilder::new().token_in(share()).repay(true).build()));
		assert!(!strategy.supports(&SwapRequestBuilder::new().build()));
		assert!(!strategy.supports(
			&SwapRequestBuilder::new()
				.token_in(share())
				.mode(SwapperMode::ExactOut)
				.build()
		));
		assert!(strategy.vault(1, USDC).is_none());
	}

	#[test]
	fn test_default_vault_list() {
		let config = Erc4626WrapperConfig::default();
		assert_eq!(config.vaults.len(), 6);
		assert_eq!(config.vaults.iter().filter(|v| v.chain_id == 146).count(), 2);
	}
}
