//! Built-in routing strategies
//!
//! Source variants quote liquidity providers directly. Wrapper variants
//! reshape the request, recurse into the pipeline and wrap the inner result
//! with extra swapper calls.

pub mod combined_uniswap;
pub mod erc4626_wrapper;
pub mod multi_source;
pub mod pendle;
pub mod redirect_deposit_wrapper;
pub mod repay_wrapper;
pub mod single_source;

pub use combined_uniswap::CombinedUniswapStrategy;
pub use erc4626_wrapper::Erc4626WrapperStrategy;
pub use multi_source::MultiSourceStrategy;
pub use pendle::PendleStrategy;
pub use redirect_deposit_wrapper::RedirectDepositWrapperStrategy;
pub use repay_wrapper::RepayWrapperStrategy;
pub use single_source::SingleSourceStrategy;

use serde::{Deserialize, Serialize};
use swap_composer::items::approve_item;
use swap_composer::{
	adjust_for_interest, apply_slippage, assemble, build_verify_debt_max, estimate_amount_from, Amounts,
	Handler, SwapItem,
};
use swap_types::{Address, Quote, RouteItem, SwapRequest, SwapResult, SwapperMode, U256};

use crate::deps::Tuning;
use crate::errors::{StrategyError, StrategyResult};
use crate::search::{overswap_band, search, SearchOutcome};
use crate::sources::QuoteSource;

/// ERC4626 vault handled by a wrapper, with the vault receiving stranded dust of its asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedVault {
	pub chain_id: u64,
	pub vault: Address,
	pub asset: Address,
	#[serde(alias = "assetDustEVault")]
	pub dust_vault: Address,
	/// Route label of the vault
	#[serde(default)]
	pub protocol: String,
}

impl WrappedVault {
	pub fn new(chain_id: u64, vault: Address, asset: Address, dust_vault: Address, protocol: &str) -> Self {
		Self {
			chain_id,
			vault,
			asset,
			dust_vault,
			protocol: protocol.to_string(),
		}
	}
}

/// Exact-input variant of `request` delivering into the swapper
pub(crate) fn exact_in_into_swapper(request: &SwapRequest) -> SwapRequest {
	request
		.clone()
		.with_mode(SwapperMode::ExactIn)
		.with_receiver(request.from)
		.with_repay(false)
}

/// Exact-input quote from `source`, flagged for a sweep when the source
/// cannot pay a receiver other than the swapper
pub(crate) async fn quote_exact_in(source: &dyn QuoteSource, request: &SwapRequest) -> StrategyResult<Quote> {
	let quote = source.quote_exact_in(request).await?;
	let must_forward = !source.can_deliver_to_receiver() && request.receiver != request.from;
	Ok(quote.forwarding_to_receiver(must_forward))
}

/// Output a quote guarantees: the provider minimum, else the slippage floor
pub(crate) fn guaranteed_output(quote: &Quote, slippage_bps: u32) -> StrategyResult<U256> {
	match quote.amount_out_min {
		Some(amount) => Ok(amount),
		None => Ok(apply_slippage(quote.amount_out, slippage_bps, false)?),
	}
}

/// Search the exact input of `source` that overswaps `request.amount` by the
/// interest buffer, starting from the output `unit_to` of a one-unit probe
pub(crate) async fn overswap_search(
	request: &SwapRequest,
	source: &dyn QuoteSource,
	unit_to: U256,
	tuning: &Tuning,
) -> StrategyResult<SearchOutcome<Quote>> {
	if unit_to.is_zero() {
		return Err(StrategyError::quote_not_found("unit probe returned zero"));
	}
	let exact_in = exact_in_into_swapper(request);
	let initial_from = estimate_amount_from(
		unit_to,
		request.amount,
		request.token_in.decimals,
		request.token_out.decimals,
	)?;
	if initial_from.is_zero() {
		return Err(StrategyError::quote_not_found("estimated input is zero"));
	}
	let target = adjust_for_interest(request.amount, tuning.interest_buffer_bps)?;
	let exact_in = &exact_in;

	search(
		target,
		initial_from,
		|amount_from| async move {
			let probe = exact_in.clone().with_amount(amount_from);
			let quote = quote_exact_in(source, &probe).await?;
			let amount_to = guaranteed_output(&quote, probe.slippage_bps)?;
			Ok((quote, amount_to))
		},
		overswap_band(target, tuning.overswap_tolerance_bps),
	)
	.await
}

/// Target-debt swap of a provider payload, verified by the residual debt
pub(crate) fn target_debt_result(
	request: &SwapRequest,
	quote: &Quote,
	amounts: Amounts,
	verifier: Address,
) -> SwapResult {
	let mut items = Vec::with_capacity(2);
	if let Some(spender) = quote.allowance_target {
		items.push(approve_item(request.token_in.address, spender));
	}
	items.push(
		SwapItem::for_request(request, Handler::Generic, quote.data.clone())
			.with_mode(SwapperMode::TargetDebt)
			.with_amount_out(request.target_debt)
			.encode(),
	);
	let verify = build_verify_debt_max(
		verifier,
		request.receiver,
		request.account_out,
		request.target_debt,
		request.deadline,
	);
	assemble(
		request,
		amounts,
		items,
		verify,
		vec![RouteItem::new(quote.protocol.clone())],
	)
}

/// Interest-adjusted debt left after repaying at least `repaid`
pub(crate) fn residual_debt_bound(request: &SwapRequest, repaid: U256, tuning: &Tuning) -> StrategyResult<U256> {
	Ok(adjust_for_interest(
		request.current_debt.saturating_sub(repaid),
		tuning.interest_buffer_bps,
	)?)
}
