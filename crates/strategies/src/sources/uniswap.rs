//! Uniswap exact-out quoting sidecar
//!
//! The sidecar runs the Uniswap routing SDK and returns the best V2 or V3
//! path, already encoded for the swapper's Uniswap handlers.

use async_trait::async_trait;
use serde::Deserialize;
use swap_composer::Handler;
use swap_types::{Bytes, SourceError, SourceResult, SwapRequest, U256};
use tracing::debug;

use super::{amount_field, send_json, AuthConfig, ClientCache, SourceConfig};

pub const SOURCE_ID: &str = "uniswap";
/// Route label of Uniswap legs
pub const PROTOCOL: &str = "Uniswap";
const SUPPORTED_CHAINS: &[u64] = &[1, 10, 56, 130, 137, 8453, 42161, 43114, 81457];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SidecarQuote {
	pub protocol: String,
	pub path: Bytes,
	pub amount_in: String,
	pub amount_out: String,
}

/// Exact-out Uniswap route with its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniswapQuote {
	pub handler: Handler,
	pub path: Bytes,
	pub amount_in: U256,
	pub amount_out: U256,
}

impl TryFrom<SidecarQuote> for UniswapQuote {
	type Error = SourceError;

	fn try_from(quote: SidecarQuote) -> Result<Self, Self::Error> {
		let handler = match quote.protocol.as_str() {
			"V2" => Handler::UniswapV2,
			"V3" => Handler::UniswapV3,
			other => {
				return Err(SourceError::invalid_response(format!(
					"unsupported uniswap protocol '{}'",
					other
				)))
			},
		};
		Ok(Self {
			handler,
			path: quote.path,
			amount_in: amount_field(&quote.amount_in, "amountIn")?,
			amount_out: amount_field(&quote.amount_out, "amountOut")?,
		})
	}
}

/// Exact-out Uniswap routing, emitted through the swapper's Uniswap handlers
/// rather than the generic one
#[async_trait]
pub trait UniswapRouter: Send + Sync {
	/// Route buying exactly `request.amount` of `token_out`
	async fn route_exact_out(&self, request: &SwapRequest) -> SourceResult<UniswapQuote>;

	fn supports_chain(&self, chain_id: u64) -> bool;
}

/// Uniswap sidecar client
#[derive(Debug)]
pub struct UniswapSource {
	config: SourceConfig,
	cache: ClientCache,
}

impl UniswapSource {
	pub fn new(config: SourceConfig, cache: ClientCache) -> Self {
		Self { config, cache }
	}
}

#[async_trait]
impl UniswapRouter for UniswapSource {
	fn supports_chain(&self, chain_id: u64) -> bool {
		SUPPORTED_CHAINS.contains(&chain_id)
	}

	async fn route_exact_out(&self, request: &SwapRequest) -> SourceResult<UniswapQuote> {
		let client = self.cache.get_client_with_auth(SOURCE_ID, &self.config, &AuthConfig::None)?;
		debug!(
			"Fetching Uniswap exact-out route on chain {} amount {}",
			request.chain_id, request.amount
		);
		let quote: SidecarQuote = send_json(client.get(self.config.endpoint("/quote")?).query(&[
			("chainId", request.chain_id.to_string()),
			("tokenIn", request.token_in.address.to_string()),
			("tokenOut", request.token_out.address.to_string()),
			("amountOut", request.amount.to_string()),
			("recipient", request.receiver.to_string()),
			("slippageBps", request.slippage_bps.to_string()),
		]))
		.await?;
		UniswapQuote::try_from(quote)
	}
}
