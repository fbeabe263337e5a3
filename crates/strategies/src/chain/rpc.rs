//! JSON-RPC `eth_call` chain reader

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_sol_types::SolCall;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use swap_composer::abi::IERC4626;
use swap_types::{Address, Bytes, U256};
use tracing::debug;

use super::{ChainReadError, ChainReadResult, ChainReader};

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
	result: Option<Bytes>,
	error: Option<RpcErrorBody>,
}

/// Chain reader issuing `eth_call` against per-chain RPC endpoints
#[derive(Debug)]
pub struct RpcChainReader {
	client: Client,
	endpoints: HashMap<u64, String>,
	request_id: AtomicU64,
}

impl RpcChainReader {
	pub fn new(endpoints: HashMap<u64, String>, timeout_ms: u64) -> ChainReadResult<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(timeout_ms))
			.build()?;
		Ok(Self {
			client,
			endpoints,
			request_id: AtomicU64::new(1),
		})
	}

	pub fn has_chain(&self, chain_id: u64) -> bool {
		self.endpoints.contains_key(&chain_id)
	}

	async fn eth_call(&self, chain_id: u64, to: Address, data: Vec<u8>) -> ChainReadResult<Bytes> {
		let endpoint = self
			.endpoints
			.get(&chain_id)
			.ok_or(ChainReadError::ChainNotConfigured { chain_id })?;

		let id = self.request_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": "eth_call",
			"params": [{ "to": to, "data": Bytes::from(data) }, "latest"],
		});

		debug!("eth_call on chain {} to {}", chain_id, to);
		let response: RpcResponse = self
			.client
			.post(endpoint)
			.json(&body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		if let Some(error) = response.error {
			return Err(ChainReadError::Rpc {
				code: error.code,
				message: error.message,
			});
		}
		response.result.ok_or(ChainReadError::Rpc {
			code: 0,
			message: "missing result".to_string(),
		})
	}

	async fn call_u256<C: SolCall<Return = U256>>(
		&self,
		chain_id: u64,
		vault: Address,
		call: C,
		name: &'static str,
	) -> ChainReadResult<U256> {
		let output = self.eth_call(chain_id, vault, call.abi_encode()).await?;
		C::abi_decode_returns(&output).map_err(|e| ChainReadError::Decode {
			call: name,
			reason: e.to_string(),
		})
	}
}

#[async_trait]
impl ChainReader for RpcChainReader {
	async fn preview_redeem(&self, chain_id: u64, vault: Address, shares: U256) -> ChainReadResult<U256> {
		self.call_u256(
			chain_id,
			vault,
			IERC4626::previewRedeemCall { shares },
			"previewRedeem",
		)
		.await
	}

	async fn preview_withdraw(&self, chain_id: u64, vault: Address, assets: U256) -> ChainReadResult<U256> {
		self.call_u256(
			chain_id,
			vault,
			IERC4626::previewWithdrawCall { assets },
			"previewWithdraw",
		)
		.await
	}

	async fn preview_deposit(&self, chain_id: u64, vault: Address, assets: U256) -> ChainReadResult<U256> {
		self.call_u256(
			chain_id,
			vault,
			IERC4626::previewDepositCall { assets },
			"previewDeposit",
		)
		.await
	}

	async fn preview_mint(&self, chain_id: u64, vault: Address, shares: U256) -> ChainReadResult<U256> {
		self.call_u256(
			chain_id,
			vault,
			IERC4626::previewMintCall { shares },
			"previewMint",
		)
		.await
	}
}
