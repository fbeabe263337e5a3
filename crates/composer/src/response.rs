//! Assembly of `SwapResult`s from quotes and multicall items

use swap_types::{
	Address, MulticallItem, Quote, RouteItem, SwapRequest, SwapResult, SwapperMode, VerifyPayload, U256,
};

use crate::abi::Handler;
use crate::errors::ComposerResult;
use crate::items::{approve_item, deposit_item, sweep_item, SwapItem};
use crate::math::apply_slippage;
use crate::payloads::{build_multicall, build_verify_skim_min};

/// Amount fields of a `SwapResult`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
	pub amount_in: U256,
	pub amount_in_max: U256,
	pub amount_out: U256,
	pub amount_out_min: U256,
}

impl Amounts {
	pub fn new(amount_in: U256, amount_in_max: U256, amount_out: U256, amount_out_min: U256) -> Self {
		Self {
			amount_in,
			amount_in_max,
			amount_out,
			amount_out_min,
		}
	}
}

/// Build a result echoing the request, executed by the request's swapper
pub fn assemble(
	request: &SwapRequest,
	amounts: Amounts,
	items: Vec<MulticallItem>,
	verify: VerifyPayload,
	route: Vec<RouteItem>,
) -> SwapResult {
	SwapResult {
		amount_in: amounts.amount_in,
		amount_in_max: amounts.amount_in_max,
		amount_out: amounts.amount_out,
		amount_out_min: amounts.amount_out_min,
		vault_in: request.vault_in,
		receiver: request.receiver,
		account_in: request.account_in,
		account_out: request.account_out,
		token_in: request.token_in.clone(),
		token_out: request.token_out.clone(),
		slippage_bps: request.slippage_bps,
		route,
		swap: build_multicall(request.from, items),
		verify,
	}
}

/// Exact-input swap of `request.amount` through a provider quote, verified by
/// a minimum skim into the receiver
pub fn exact_input_result(request: &SwapRequest, quote: &Quote, verifier: Address) -> ComposerResult<SwapResult> {
	let amount_out_min = apply_slippage(quote.amount_out, request.slippage_bps, false)?;

	let mut items = Vec::with_capacity(3);
	if let Some(spender) = quote.allowance_target {
		items.push(approve_item(request.token_in.address, spender));
	}
	items.push(
		SwapItem::for_request(request, Handler::Generic, quote.data.clone())
			.with_mode(SwapperMode::ExactIn)
			.with_amount_out(U256::ZERO)
			.encode(),
	);
	if quote.must_forward_to_receiver {
		items.push(sweep_item(
			request.token_out.address,
			U256::ZERO,
			request.receiver,
		));
	}

	let verify = build_verify_skim_min(
		verifier,
		request.receiver,
		request.account_out,
		amount_out_min,
		request.deadline,
	);

	Ok(assemble(
		request,
		Amounts::new(request.amount, request.amount, quote.amount_out, amount_out_min),
		items,
		verify,
		vec![RouteItem::new(quote.protocol.clone())],
	))
}

/// Append 1-wei deposits of both sides so leftovers land in the accounts' vaults
pub fn add_in_out_deposits(request: &SwapRequest, mut result: SwapResult) -> SwapResult {
	let mut items = result.swap.multicall_items;
	items.push(deposit_item(
		request.token_in.address,
		request.vault_in,
		U256::from(1u64),
		request.account_in,
	));
	items.push(deposit_item(
		request.token_out.address,
		request.receiver,
		U256::from(1u64),
		request.account_out,
	));
	result.swap = build_multicall(request.from, items);
	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_types::test_utils::{sample_request, TEST_VERIFIER};
	use swap_types::{Bytes, VerificationKind};

	fn quote(amount_out: u64) -> Quote {
		Quote::new(
			U256::from(100u64),
			U256::from(amount_out),
			Bytes::from(vec![0xde, 0xad]),
			"TestSource",
		)
	}

	#[test]
	fn test_exact_input_result() {
		let request = sample_request();
		let result = exact_input_result(&request, &quote(200), TEST_VERIFIER).unwrap();

		assert_eq!(result.amount_in, U256::from(100u64));
		assert_eq!(result.amount_in_max, U256::from(100u64));
		assert_eq!(result.amount_out, U256::from(200u64));
		assert_eq!(result.amount_out_min, U256::from(199u64));
		assert_eq!(result.route_labels(), vec!["TestSource"]);
		assert_eq!(result.swap.swapper_address, request.from);
		assert_eq!(result.swap.multicall_items.len(), 1);
		assert_eq!(result.verify.kind, VerificationKind::SkimMin);
		assert_eq!(result.verify.vault, request.receiver);
		assert_eq!(result.verify.account, request.account_out);
		assert_eq!(result.verify.amount, U256::from(199u64));
	}

	#[test]
	fn test_exact_input_with_approval_and_sweep() {
		let request = sample_request();
		let quote = quote(200)
			.with_allowance_target(Some(Address::repeat_byte(0x22)))
			.forwarding_to_receiver(true);
		let result = exact_input_result(&request, &quote, TEST_VERIFIER).unwrap();

		let names: Vec<&str> = result
			.swap
			.multicall_items
			.iter()
			.map(|item| item.function_name.as_str())
			.collect();
		assert_eq!(names, vec!["swap", "swap", "sweep"]);
		let swap = SwapItem::decode(&result.swap.multicall_items[1]).unwrap();
		assert_eq!(swap.mode, SwapperMode::ExactIn);
		assert_eq!(swap.receiver, request.receiver);
	}

	#[test]
	fn test_add_in_out_deposits() {
		let request = sample_request();
		let result = exact_input_result(&request, &quote(200), TEST_VERIFIER).unwrap();
		let result = add_in_out_deposits(&request, result);

		let items = &result.swap.multicall_items;
		assert_eq!(items.len(), 3);
		assert_eq!(items[1].function_name, "deposit");
		assert_eq!(items[1].args[1], serde_json::json!(request.vault_in));
		assert_eq!(items[2].args[1], serde_json::json!(request.receiver));
	}
}
