//! Pendle SDK swap source for principal-token markets

use async_trait::async_trait;
use serde::Deserialize;
use swap_composer::items::generic_payload;
use swap_types::{Address, Bytes, Quote, SourceError, SourceResult, SwapRequest};
use tracing::debug;

use super::{amount_field, send_json, slippage_fraction, AuthConfig, ClientCache, QuoteSource, SourceConfig};

pub const SOURCE_ID: &str = "pendle";
const PROTOCOL: &str = "Pendle";
const SUPPORTED_CHAINS: &[u64] = &[1, 10, 56, 146, 5000, 8453, 42161];

#[derive(Debug, Deserialize)]
pub(crate) struct PendleTx {
	pub to: Address,
	pub data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PendleData {
	pub amount_out: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendleSwapResponse {
	pub tx: PendleTx,
	pub data: PendleData,
}

/// Pendle hosted SDK, exact input through the principal token's market
#[derive(Debug)]
pub struct PendleSource {
	config: SourceConfig,
	cache: ClientCache,
}

impl PendleSource {
	pub fn new(config: SourceConfig, cache: ClientCache) -> Self {
		Self { config, cache }
	}

	pub fn is_supported_chain(chain_id: u64) -> bool {
		SUPPORTED_CHAINS.contains(&chain_id)
	}

	fn to_quote(request: &SwapRequest, response: PendleSwapResponse) -> SourceResult<Quote> {
		Ok(Quote::new(
			request.amount,
			amount_field(&response.data.amount_out, "data.amountOut")?,
			generic_payload(response.tx.to, response.tx.data.to_vec()),
			PROTOCOL,
		))
	}
}

#[async_trait]
impl QuoteSource for PendleSource {
	fn id(&self) -> &str {
		SOURCE_ID
	}

	fn supports_chain(&self, chain_id: u64) -> bool {
		Self::is_supported_chain(chain_id)
	}

	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote> {
		let market = request
			.principal_market()
			.ok_or_else(|| SourceError::invalid_response("no principal token market on either side"))?;
		let client = self.cache.get_client_with_auth(
			SOURCE_ID,
			&self.config,
			&AuthConfig::bearer(self.config.api_key.as_deref()),
		)?;
		let url = self.config.endpoint(&format!(
			"/core/v1/sdk/{}/markets/{}/swap",
			request.chain_id, market
		))?;

		debug!(
			"Fetching Pendle quote on chain {} market {} amount {}",
			request.chain_id, market, request.amount
		);

		let response: PendleSwapResponse = send_json(client.get(&url).query(&[
			("receiver", request.receiver.to_string()),
			("slippage", slippage_fraction(request.slippage_bps)),
			("enableAggregator", "true".to_string()),
			("tokenIn", request.token_in.address.to_string()),
			("tokenOut", request.token_out.address.to_string()),
			("amountIn", request.amount.to_string()),
		]))
		.await?;

		Self::to_quote(request, response)
	}
}
