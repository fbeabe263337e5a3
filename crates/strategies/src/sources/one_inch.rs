//! 1inch swap API source

use async_trait::async_trait;
use serde::Deserialize;
use swap_composer::items::generic_payload;
use swap_types::{Address, Bytes, Quote, SourceResult, SwapRequest};
use tracing::debug;

use super::{amount_field, send_json, slippage_percent, AuthConfig, ClientCache, QuoteSource, SourceConfig};

pub const SOURCE_ID: &str = "1inch";
const PROTOCOL: &str = "1Inch";
const EXCLUDED_PROTOCOLS: &str =
	"ONE_INCH_LIMIT_ORDER_V4,ONE_INCH_LIMIT_ORDER_V3,ONE_INCH_LIMIT_ORDER_V2,ONE_INCH_LIMIT_ORDER";
const SUPPORTED_CHAINS: &[u64] = &[1, 10, 56, 100, 137, 146, 324, 8453, 42161, 43114, 59144];

#[derive(Debug, Deserialize)]
pub(crate) struct OneInchTx {
	pub to: Address,
	pub data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OneInchSwapResponse {
	pub dst_amount: String,
	pub tx: OneInchTx,
}

/// 1inch v6 swap endpoint, exact input only
#[derive(Debug)]
pub struct OneInchSource {
	config: SourceConfig,
	cache: ClientCache,
}

impl OneInchSource {
	pub fn new(config: SourceConfig, cache: ClientCache) -> Self {
		Self { config, cache }
	}

	fn to_quote(request: &SwapRequest, response: OneInchSwapResponse) -> SourceResult<Quote> {
		let amount_out = amount_field(&response.dst_amount, "dstAmount")?;
		Ok(Quote::new(
			request.amount,
			amount_out,
			generic_payload(response.tx.to, response.tx.data.to_vec()),
			PROTOCOL,
		))
	}
}

#[async_trait]
impl QuoteSource for OneInchSource {
	fn id(&self) -> &str {
		SOURCE_ID
	}

	fn supports_chain(&self, chain_id: u64) -> bool {
		SUPPORTED_CHAINS.contains(&chain_id)
	}

	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote> {
		let client = self.cache.get_client_with_auth(
			SOURCE_ID,
			&self.config,
			&AuthConfig::bearer(self.config.api_key.as_deref()),
		)?;
		let url = self
			.config
			.endpoint(&format!("/swap/v6.0/{}/swap", request.chain_id))?;

		debug!(
			"Fetching 1inch quote on chain {}: {} -> {} amount {}",
			request.chain_id, request.token_in.address, request.token_out.address, request.amount
		);

		let response: OneInchSwapResponse = send_json(client.get(&url).query(&[
			("src", request.token_in.address.to_string()),
			("dst", request.token_out.address.to_string()),
			("amount", request.amount.to_string()),
			("from", request.from.to_string()),
			("origin", request.origin.to_string()),
			("slippage", slippage_percent(request.slippage_bps)),
			("receiver", request.receiver.to_string()),
			("disableEstimate", "true".to_string()),
			("includeProtocols", "true".to_string()),
			("excludedProtocols", EXCLUDED_PROTOCOLS.to_string()),
		]))
		.await?;

		Self::to_quote(request, response)
	}
}
