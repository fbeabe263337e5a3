//! Request fixtures

use swap_router::types::test_utils::{TEST_ACCOUNT, TEST_RECEIVER, TEST_VAULT_IN, USDC, WETH};
use swap_router::{SwapParams, SwapperMode, U256};

/// Exact-in USDC -> WETH of 100 base units at 0.5% slippage
#[allow(dead_code)]
pub fn exact_in_params() -> SwapParams {
	SwapParams {
		chain_id: 1,
		token_in: USDC,
		token_out: WETH,
		receiver: TEST_RECEIVER,
		vault_in: TEST_VAULT_IN,
		origin: TEST_ACCOUNT,
		account_in: TEST_ACCOUNT,
		account_out: TEST_ACCOUNT,
		mode: SwapperMode::ExactIn,
		amount: U256::from(100u64),
		target_debt: U256::ZERO,
		current_debt: U256::ZERO,
		slippage_bps: 50,
		deadline: 1_736_263_541,
		is_repay: false,
		routing_override: None,
	}
}

/// Query string equivalent of [`exact_in_params`]
#[allow(dead_code)]
pub fn exact_in_query() -> Vec<(&'static str, String)> {
	vec![
		("chainId", "1".to_string()),
		("tokenIn", USDC.to_string()),
		("tokenOut", WETH.to_string()),
		("receiver", TEST_RECEIVER.to_string()),
		("vaultIn", TEST_VAULT_IN.to_string()),
		("origin", TEST_ACCOUNT.to_string()),
		("accountIn", TEST_ACCOUNT.to_string()),
		("accountOut", TEST_ACCOUNT.to_string()),
		("amount", "100".to_string()),
		("swapperMode", "0".to_string()),
		("slippage", "0.5".to_string()),
		("deadline", "1736263541".to_string()),
		("isRepay", "false".to_string()),
	]
}

/// Replace or add one query parameter
#[allow(dead_code)]
pub fn with_param(
	mut query: Vec<(&'static str, String)>,
	key: &'static str,
	value: &str,
) -> Vec<(&'static str, String)> {
	query.retain(|(k, _)| *k != key);
	query.push((key, value.to_string()));
	query
}
