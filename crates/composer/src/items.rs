//! Swapper multicall item encoders
//!
//! Every item carries the encoded swapper call plus a readable rendering of its
//! arguments, with amounts as decimal strings.

use alloy_sol_types::{SolCall, SolValue};
use serde_json::json;
use swap_types::{Address, Bytes, MulticallItem, SwapRequest, SwapperMode, B256, U256};

use crate::abi::{Handler, IERC20, IERC4626, ISwapper};

/// Typed form of the swapper `swap(SwapParams)` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapItem {
	pub handler: B256,
	pub mode: SwapperMode,
	pub account: Address,
	pub token_in: Address,
	pub token_out: Address,
	pub vault_in: Address,
	pub account_in: Address,
	pub receiver: Address,
	pub amount_out: U256,
	pub data: Bytes,
}

impl SwapItem {
	/// Swap on behalf of the request's accounts, in the request's mode
	pub fn for_request(request: &SwapRequest, handler: Handler, data: Bytes) -> Self {
		Self {
			handler: handler.id(),
			mode: request.mode,
			account: request.account_out,
			token_in: request.token_in.address,
			token_out: request.token_out.address,
			vault_in: request.vault_in,
			account_in: request.account_in,
			receiver: request.receiver,
			amount_out: mode_amount_out(request, request.amount),
			data,
		}
	}

	/// Generic call with every routing field zeroed
	fn bare(data: Bytes) -> Self {
		Self {
			handler: Handler::Generic.id(),
			mode: SwapperMode::ExactIn,
			account: Address::ZERO,
			token_in: Address::ZERO,
			token_out: Address::ZERO,
			vault_in: Address::ZERO,
			account_in: Address::ZERO,
			receiver: Address::ZERO,
			amount_out: U256::ZERO,
			data,
		}
	}

	pub fn with_mode(mut self, mode: SwapperMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_amount_out(mut self, amount_out: U256) -> Self {
		self.amount_out = amount_out;
		self
	}

	pub fn with_receiver(mut self, receiver: Address) -> Self {
		self.receiver = receiver;
		self
	}

	fn params(&self) -> ISwapper::SwapParams {
		ISwapper::SwapParams {
			handler: self.handler,
			mode: self.mode.as_u256(),
			account: self.account,
			tokenIn: self.token_in,
			tokenOut: self.token_out,
			vaultIn: self.vault_in,
			accountIn: self.account_in,
			receiver: self.receiver,
			amountOut: self.amount_out,
			data: self.data.clone(),
		}
	}

	pub fn encode(&self) -> MulticallItem {
		let data = ISwapper::swapCall {
			params: self.params(),
		}
		.abi_encode();
		MulticallItem {
			function_name: "swap".to_string(),
			args: json!([{
				"handler": self.handler,
				"mode": self.mode.as_u8().to_string(),
				"account": self.account,
				"tokenIn": self.token_in,
				"tokenOut": self.token_out,
				"vaultIn": self.vault_in,
				"accountIn": self.account_in,
				"receiver": self.receiver,
				"amountOut": self.amount_out.to_string(),
				"data": self.data,
			}]),
			data: data.into(),
		}
	}

	/// Decode a `swap` item back into its typed form
	pub fn decode(item: &MulticallItem) -> Option<Self> {
		if item.function_name != "swap" {
			return None;
		}
		let call = ISwapper::swapCall::abi_decode(&item.data).ok()?;
		let params = call.params;
		let mode = u8::try_from(params.mode)
			.ok()
			.and_then(|raw| SwapperMode::try_from(raw).ok())?;
		Some(Self {
			handler: params.handler,
			mode,
			account: params.account,
			token_in: params.tokenIn,
			token_out: params.tokenOut,
			vault_in: params.vaultIn,
			account_in: params.accountIn,
			receiver: params.receiver,
			amount_out: params.amountOut,
			data: params.data,
		})
	}
}

/// Swapper `amountOut` for a call in the request's mode: ignored for exact
/// input, the bought amount for exact output, the residual debt otherwise
fn mode_amount_out(request: &SwapRequest, exact_out_amount: U256) -> U256 {
	match request.mode {
		SwapperMode::ExactIn => U256::ZERO,
		SwapperMode::ExactOut => exact_out_amount,
		SwapperMode::TargetDebt => request.target_debt,
	}
}

/// `abi.encode(target, call)` payload of the generic handler
pub fn generic_payload(target: Address, call: Vec<u8>) -> Bytes {
	(target, Bytes::from(call)).abi_encode_params().into()
}

pub fn deposit_item(token: Address, vault: Address, amount_min: U256, account: Address) -> MulticallItem {
	let data = ISwapper::depositCall {
		token,
		vault,
		amountMin: amount_min,
		account,
	}
	.abi_encode();
	MulticallItem {
		function_name: "deposit".to_string(),
		args: json!([token, vault, amount_min.to_string(), account]),
		data: data.into(),
	}
}

pub fn repay_item(token: Address, vault: Address, repay_amount: U256, account: Address) -> MulticallItem {
	let data = ISwapper::repayCall {
		token,
		vault,
		repayAmount: repay_amount,
		account,
	}
	.abi_encode();
	MulticallItem {
		function_name: "repay".to_string(),
		args: json!([token, vault, repay_amount.to_string(), account]),
		data: data.into(),
	}
}

pub fn repay_and_deposit_item(
	token: Address,
	vault: Address,
	repay_amount: U256,
	account: Address,
) -> MulticallItem {
	let data = ISwapper::repayAndDepositCall {
		token,
		vault,
		repayAmount: repay_amount,
		account,
	}
	.abi_encode();
	MulticallItem {
		function_name: "repayAndDeposit".to_string(),
		args: json!([token, vault, repay_amount.to_string(), account]),
		data: data.into(),
	}
}

pub fn sweep_item(token: Address, amount_min: U256, to: Address) -> MulticallItem {
	let data = ISwapper::sweepCall {
		token,
		amountMin: amount_min,
		to,
	}
	.abi_encode();
	MulticallItem {
		function_name: "sweep".to_string(),
		args: json!([token, amount_min.to_string(), to]),
		data: data.into(),
	}
}

/// Unlimited ERC20 approval issued from the swapper
pub fn approve_item(token: Address, spender: Address) -> MulticallItem {
	let call = IERC20::approveCall {
		spender,
		amount: U256::MAX,
	}
	.abi_encode();
	SwapItem::bare(generic_payload(token, call)).encode()
}

/// ERC20 transfer issued from the swapper
pub fn transfer_item(token: Address, amount: U256, receiver: Address) -> MulticallItem {
	let call = IERC20::transferCall {
		to: receiver,
		amount,
	}
	.abi_encode();
	let mut item = SwapItem::bare(generic_payload(token, call));
	item.token_in = token;
	item.token_out = token;
	item.encode()
}

/// ERC4626 `redeem` of `shares`, expected to yield `assets`
pub fn redeem_item(
	request: &SwapRequest,
	vault: Address,
	shares: U256,
	assets: U256,
	receiver: Address,
) -> MulticallItem {
	let call = IERC4626::redeemCall {
		amount: shares,
		receiver,
		owner: request.from,
	}
	.abi_encode();
	SwapItem::for_request(request, Handler::Generic, generic_payload(vault, call))
		.with_amount_out(mode_amount_out(request, assets))
		.encode()
}

/// ERC4626 `withdraw` of `assets`
pub fn withdraw_item(request: &SwapRequest, vault: Address, assets: U256, receiver: Address) -> MulticallItem {
	let call = IERC4626::withdrawCall {
		amount: assets,
		receiver,
		owner: request.from,
	}
	.abi_encode();
	SwapItem::for_request(request, Handler::Generic, generic_payload(vault, call))
		.with_amount_out(mode_amount_out(request, assets))
		.encode()
}

/// ERC4626 `mint` of `shares`
pub fn mint_item(request: &SwapRequest, vault: Address, shares: U256, receiver: Address) -> MulticallItem {
	let call = IERC4626::mintCall {
		amount: shares,
		receiver,
	}
	.abi_encode();
	SwapItem::for_request(request, Handler::Generic, generic_payload(vault, call))
		.with_amount_out(mode_amount_out(request, shares))
		.encode()
}

/// Re-encode every swap item of `items` in `mode`, leaving other calls untouched
pub fn rewrite_swap_modes(items: Vec<MulticallItem>, from: SwapperMode, to: SwapperMode) -> Vec<MulticallItem> {
	items
		.into_iter()
		.map(|item| match SwapItem::decode(&item) {
			Some(swap) if swap.mode == from => swap.with_mode(to).encode(),
			_ => item,
		})
		.collect()
}
