//! KyberSwap aggregator source
//!
//! Quoting is two calls: a route search, then a build of the chosen route
//! into router calldata.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swap_composer::items::generic_payload;
use swap_types::{Address, Bytes, Quote, SourceError, SourceResult, SwapRequest};
use tracing::debug;

use super::{amount_field, send_json, AuthConfig, ClientCache, QuoteSource, SourceConfig};

pub const SOURCE_ID: &str = "kyberswap";
const PROTOCOL: &str = "Kyberswap";
const DEFAULT_CLIENT_ID: &str = "swap-router";

/// KyberSwap path segment of a chain id
pub fn chain_name(chain_id: u64) -> Option<&'static str> {
	Some(match chain_id {
		1 => "ethereum",
		10 => "optimism",
		25 => "cronos",
		56 => "bsc",
		137 => "polygon",
		199 => "bttc",
		250 => "fantom",
		1101 => "polygon-zkevm",
		5000 => "mantle",
		8453 => "base",
		42161 => "arbitrum",
		43114 => "avalanche",
		59144 => "linea",
		81457 => "blast",
		534352 => "scroll",
		1313161554 => "aurora",
		_ => return None,
	})
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoutesData {
	/// Passed back verbatim to the build call
	pub route_summary: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoutesResponse {
	pub data: RoutesData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildRequest<'a> {
	route_summary: &'a serde_json::Value,
	slippage_tolerance: u32,
	recipient: Address,
	source: &'a str,
	sender: Address,
	skip_simulate_transaction: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BuildData {
	pub amount_out: String,
	pub router_address: Address,
	pub data: Bytes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BuildResponse {
	pub data: BuildData,
}

/// KyberSwap aggregator, exact input only
#[derive(Debug)]
pub struct KyberSwapSource {
	config: SourceConfig,
	cache: ClientCache,
}

impl KyberSwapSource {
	pub fn new(config: SourceConfig, cache: ClientCache) -> Self {
		Self { config, cache }
	}

	fn client_id(&self) -> &str {
		self.config.referrer.as_deref().unwrap_or(DEFAULT_CLIENT_ID)
	}

	fn to_quote(request: &SwapRequest, built: BuildResponse) -> SourceResult<Quote> {
		Ok(Quote::new(
			request.amount,
			amount_field(&built.data.amount_out, "data.amountOut")?,
			generic_payload(built.data.router_address, built.data.data.to_vec()),
			PROTOCOL,
		))
	}
}

#[async_trait]
impl QuoteSource for KyberSwapSource {
	fn id(&self) -> &str {
		SOURCE_ID
	}

	fn supports_chain(&self, chain_id: u64) -> bool {
		chain_name(chain_id).is_some()
	}

	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote> {
		let chain = chain_name(request.chain_id).ok_or_else(|| SourceError::ChainNotSupported {
			chain_id: request.chain_id,
			source_id: SOURCE_ID.to_string(),
		})?;
		let client = self.cache.get_client_with_auth(
			SOURCE_ID,
			&self.config,
			&AuthConfig::header("x-client-id", Some(self.client_id())),
		)?;

		debug!(
			"Fetching KyberSwap route on {}: {} -> {} amount {}",
			chain, request.token_in.address, request.token_out.address, request.amount
		);

		let routes: RoutesResponse = send_json(
			client
				.get(self.config.endpoint(&format!("/{}/api/v1/routes", chain))?)
				.query(&[
					("tokenIn", request.token_in.address.to_string()),
					("tokenOut", request.token_out.address.to_string()),
					("amountIn", request.amount.to_string()),
					("gasInclude", "true".to_string()),
				]),
		)
		.await?;

		let body = BuildRequest {
			route_summary: &routes.data.route_summary,
			slippage_tolerance: request.slippage_bps,
			recipient: request.receiver,
			source: self.client_id(),
			sender: request.from,
			skip_simulate_transaction: true,
		};
		let built: BuildResponse = send_json(
			client
				.post(self.config.endpoint(&format!("/{}/api/v1/route/build", chain))?)
				.json(&body),
		)
		.await?;

		Self::to_quote(request, built)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_types::test_utils::sample_request;
	use swap_types::U256;

	#[test]
	fn test_chain_names() {
		assert_eq!(chain_name(1), Some("ethereum"));
		assert_eq!(chain_name(8453), Some("base"));
		assert_eq!(chain_name(146), None);
	}

	#[test]
	fn test_parse_route_and_build() {
		let routes: RoutesResponse = serde_json::from_str(
			r#"{"code":0,"data":{"routeSummary":{"amountOut":"123","route":[]},"routerAddress":"0x6131b5fae19ea4f9d964eac0408e4408b66337b5"}}"#,
		)
		.unwrap();
		assert_eq!(routes.data.route_summary["amountOut"], "123");

		let built: BuildResponse = serde_json::from_str(
			r#"{"code":0,"data":{"amountIn":"100","amountOut":"120","routerAddress":"0x6131b5fae19ea4f9d964eac0408e4408b66337b5","data":"0xe21fd0e9"}}"#,
		)
		.unwrap();
		let quote = KyberSwapSource::to_quote(&sample_request(), built).unwrap();
		assert_eq!(quote.amount_out, U256::from(120u64));
		assert_eq!(quote.protocol, "Kyberswap");
	}

	#[test]
	fn test_build_request_shape() {
		let summary = serde_json::json!({"amountOut": "1"});
		let request = sample_request();
		let body = BuildRequest {
			route_summary: &summary,
			slippage_tolerance: 50,
			recipient: request.receiver,
			source: "swap-router",
			sender: request.from,
			skip_simulate_transaction: true,
		};
		let value = serde_json::to_value(&body).unwrap();
		assert_eq!(value["slippageTolerance"], 50);
		assert_eq!(value["skipSimulateTransaction"], true);
		assert!(value.get("routeSummary").is_some());
	}
}
