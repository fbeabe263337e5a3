//! Swapper multicall and verifier payloads

use alloy_sol_types::SolCall;
use swap_types::{Address, Bytes, MulticallItem, SwapPayload, VerificationKind, VerifyPayload, U256};

use crate::abi::{ISwapVerifier, ISwapper};
use crate::errors::{ComposerError, ComposerResult};

/// Wrap the items' calls, in order, into a single swapper `multicall`
pub fn build_multicall(swapper: Address, items: Vec<MulticallItem>) -> SwapPayload {
	let calls: Vec<Bytes> = items.iter().map(|item| item.data.clone()).collect();
	let swapper_data = ISwapper::multicallCall { calls }.abi_encode();
	SwapPayload {
		swapper_address: swapper,
		swapper_data: swapper_data.into(),
		multicall_items: items,
	}
}

/// Require at least `amount_min` of the receiver vault's shares, skimmed to `account`
pub fn build_verify_skim_min(
	verifier: Address,
	vault: Address,
	account: Address,
	amount_min: U256,
	deadline: u64,
) -> VerifyPayload {
	let verifier_data = ISwapVerifier::verifyAmountMinAndSkimCall {
		vault,
		account,
		amountMin: amount_min,
		deadline: U256::from(deadline),
	}
	.abi_encode();
	VerifyPayload {
		verifier_address: verifier,
		verifier_data: verifier_data.into(),
		kind: VerificationKind::SkimMin,
		vault,
		account,
		amount: amount_min,
		deadline,
	}
}

/// Require the account's debt in `vault` to be at most `amount_max`
pub fn build_verify_debt_max(
	verifier: Address,
	vault: Address,
	account: Address,
	amount_max: U256,
	deadline: u64,
) -> VerifyPayload {
	let verifier_data = ISwapVerifier::verifyDebtMaxCall {
		vault,
		account,
		amountMax: amount_max,
		deadline: U256::from(deadline),
	}
	.abi_encode();
	VerifyPayload {
		verifier_address: verifier,
		verifier_data: verifier_data.into(),
		kind: VerificationKind::DebtMax,
		vault,
		account,
		amount: amount_max,
		deadline,
	}
}

/// Fail closed when the verifier calldata cannot hold a function selector
pub fn ensure_verifier_calldata(verify: &VerifyPayload) -> ComposerResult<()> {
	if verify.verifier_data.len() < 4 {
		return Err(ComposerError::InvalidVerifierData {
			len: verify.verifier_data.len(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::items::{deposit_item, sweep_item};
	use swap_types::test_utils::{TEST_ACCOUNT, TEST_RECEIVER, TEST_SWAPPER, TEST_VERIFIER, WETH};

	#[test]
	fn test_multicall_preserves_order_and_is_deterministic() {
		let items = vec![
			deposit_item(WETH, TEST_RECEIVER, U256::from(1u64), TEST_ACCOUNT),
			sweep_item(WETH, U256::ZERO, TEST_RECEIVER),
		];
		let first = build_multicall(TEST_SWAPPER, items.clone());
		let second = build_multicall(TEST_SWAPPER, items.clone());
		assert_eq!(first, second);
		assert_eq!(first.multicall_items, items);

		let decoded = ISwapper::multicallCall::abi_decode(&first.swapper_data).unwrap();
		assert_eq!(decoded.calls, vec![items[0].data.clone(), items[1].data.clone()]);
	}

	#[test]
	fn test_verify_payloads() {
		let skim = build_verify_skim_min(TEST_VERIFIER, TEST_RECEIVER, TEST_ACCOUNT, U256::from(199u64), 100);
		assert_eq!(skim.kind, VerificationKind::SkimMin);
		assert_eq!(&skim.verifier_data[..4], &ISwapVerifier::verifyAmountMinAndSkimCall::SELECTOR);
		assert!(ensure_verifier_calldata(&skim).is_ok());

		let debt = build_verify_debt_max(TEST_VERIFIER, TEST_RECEIVER, TEST_ACCOUNT, U256::from(5u64), 100);
		assert_eq!(debt.kind, VerificationKind::DebtMax);
		let call = ISwapVerifier::verifyDebtMaxCall::abi_decode(&debt.verifier_data).unwrap();
		assert_eq!(call.amountMax, U256::from(5u64));
		assert_eq!(call.deadline, U256::from(100u64));
	}

	#[test]
	fn test_short_verifier_data_fails_closed() {
		let mut verify = build_verify_skim_min(TEST_VERIFIER, TEST_RECEIVER, TEST_ACCOUNT, U256::ZERO, 0);
		verify.verifier_data = Bytes::from(vec![0xab, 0xcd]);
		assert_eq!(
			ensure_verifier_calldata(&verify),
			Err(ComposerError::InvalidVerifierData { len: 2 })
		);
	}
}
