//! On-chain reads used by vault strategies

pub mod rpc;

use async_trait::async_trait;
use swap_types::{Address, U256};
use thiserror::Error;

pub use rpc::RpcChainReader;

/// Chain read errors
#[derive(Error, Debug)]
pub enum ChainReadError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	#[error("Failed to decode {call} result: {reason}")]
	Decode { call: &'static str, reason: String },

	#[error("No RPC endpoint configured for chain {chain_id}")]
	ChainNotConfigured { chain_id: u64 },
}

pub type ChainReadResult<T> = Result<T, ChainReadError>;

/// ERC4626 preview reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
	/// Assets returned for redeeming `shares`
	async fn preview_redeem(&self, chain_id: u64, vault: Address, shares: U256) -> ChainReadResult<U256>;

	/// Shares burned for withdrawing `assets`
	async fn preview_withdraw(&self, chain_id: u64, vault: Address, assets: U256) -> ChainReadResult<U256>;

	/// Shares minted for depositing `assets`
	async fn preview_deposit(&self, chain_id: u64, vault: Address, assets: U256) -> ChainReadResult<U256>;

	/// Assets pulled for minting `shares`
	async fn preview_mint(&self, chain_id: u64, vault: Address, shares: U256) -> ChainReadResult<U256>;
}
