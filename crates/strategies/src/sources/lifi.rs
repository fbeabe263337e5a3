//! LI.FI quote API source

use async_trait::async_trait;
use serde::Deserialize;
use swap_composer::items::generic_payload;
use swap_types::{Address, Bytes, Quote, SourceError, SourceResult, SwapRequest};
use tracing::debug;

use super::{amount_field, send_json, slippage_fraction, AuthConfig, ClientCache, QuoteSource, SourceConfig};

pub const SOURCE_ID: &str = "lifi";
const PROTOCOL: &str = "LI.FI";
const DEFAULT_INTEGRATOR: &str = "swap-router";

/// LI.FI chain key of a chain id
pub fn chain_key(chain_id: u64) -> Option<&'static str> {
	Some(match chain_id {
		1 => "eth",
		10 => "opt",
		30 => "rsk",
		56 => "bsc",
		100 => "dai",
		122 => "fus",
		137 => "pol",
		250 => "ftm",
		252 => "fra",
		288 => "bob",
		324 => "era",
		1088 => "mam",
		1101 => "pze",
		1284 => "moo",
		1285 => "mor",
		1329 => "sei",
		1625 => "gra",
		5000 => "mnt",
		8453 => "bas",
		13371 => "imx",
		34443 => "mod",
		42161 => "arb",
		42220 => "cel",
		43114 => "ava",
		59144 => "lna",
		81457 => "bls",
		167000 => "tai",
		534352 => "scl",
		1313161554 => "aur",
		_ => return None,
	})
}

#[derive(Debug, Deserialize)]
pub(crate) struct LifiTransactionRequest {
	pub to: Address,
	pub data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LifiEstimate {
	pub from_amount: String,
	pub to_amount: String,
	pub to_amount_min: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LifiAction {
	pub from_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LifiQuoteResponse {
	pub action: LifiAction,
	pub estimate: LifiEstimate,
	pub transaction_request: LifiTransactionRequest,
}

/// LI.FI aggregator, exact input and exact output
#[derive(Debug)]
pub struct LifiSource {
	config: SourceConfig,
	cache: ClientCache,
}

impl LifiSource {
	pub fn new(config: SourceConfig, cache: ClientCache) -> Self {
		Self { config, cache }
	}

	async fn fetch(&self, request: &SwapRequest, exact_out: bool) -> SourceResult<LifiQuoteResponse> {
		let key = chain_key(request.chain_id).ok_or_else(|| SourceError::ChainNotSupported {
			chain_id: request.chain_id,
			source_id: SOURCE_ID.to_string(),
		})?;
		let client = self.cache.get_client_with_auth(
			SOURCE_ID,
			&self.config,
			&AuthConfig::header("x-lifi-api-key", self.config.api_key.as_deref()),
		)?;

		let (path, amount_param) = if exact_out {
			("/v1/quote/toAmount", "toAmount")
		} else {
			("/v1/quote", "fromAmount")
		};
		let integrator = self
			.config
			.referrer
			.clone()
			.unwrap_or_else(|| DEFAULT_INTEGRATOR.to_string());

		debug!(
			"Fetching LI.FI {} quote on chain {} amount {}",
			if exact_out { "exact-out" } else { "exact-in" },
			request.chain_id,
			request.amount
		);

		send_json(client.get(self.config.endpoint(path)?).query(&[
			("fromChain", key.to_string()),
			("toChain", key.to_string()),
			("fromToken", request.token_in.address.to_string()),
			("toToken", request.token_out.address.to_string()),
			("fromAddress", request.from.to_string()),
			("toAddress", request.receiver.to_string()),
			(amount_param, request.amount.to_string()),
			("slippage", slippage_fraction(request.slippage_bps)),
			("integrator", integrator),
		]))
		.await
	}

	fn exact_in_quote(response: LifiQuoteResponse) -> SourceResult<Quote> {
		Ok(Quote::new(
			amount_field(&response.estimate.from_amount, "estimate.fromAmount")?,
			amount_field(&response.estimate.to_amount, "estimate.toAmount")?,
			generic_payload(
				response.transaction_request.to,
				response.transaction_request.data.to_vec(),
			),
			PROTOCOL,
		))
	}

	fn exact_out_quote(response: LifiQuoteResponse) -> SourceResult<Quote> {
		let mut quote = Quote::new(
			amount_field(&response.action.from_amount, "action.fromAmount")?,
			amount_field(&response.estimate.to_amount, "estimate.toAmount")?,
			generic_payload(
				response.transaction_request.to,
				response.transaction_request.data.to_vec(),
			),
			PROTOCOL,
		);
		if let Some(min) = &response.estimate.to_amount_min {
			quote = quote.with_amount_out_min(amount_field(min, "estimate.toAmountMin")?);
		}
		Ok(quote)
	}
}

#[async_trait]
impl QuoteSource for LifiSource {
	fn id(&self) -> &str {
		SOURCE_ID
	}

	fn supports_chain(&self, chain_id: u64) -> bool {
		chain_key(chain_id).is_some()
	}

	fn supports_exact_out(&self) -> bool {
		true
	}

	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote> {
		Self::exact_in_quote(self.fetch(request, false).await?)
	}

	async fn quote_exact_out(&self, request: &SwapRequest) -> SourceResult<Quote> {
		Self::exact_out_quote(self.fetch(request, true).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_types::U256;

	const RESPONSE: &str = r#"{
		"type": "lifi",
		"action": { "fromAmount": "1005000", "fromChainId": 1 },
		"estimate": { "fromAmount": "1000000", "toAmount": "499000000000000", "toAmountMin": "496505000000000" },
		"transactionRequest": { "to": "0x1231deb6f5749ef6ce6943a275a1d3e7486f4eae", "data": "0xdeadbeef" }
	}"#;

	#[test]
	fn test_chain_keys() {
		assert_eq!(chain_key(1), Some("eth"));
		assert_eq!(chain_key(42161), Some("arb"));
		assert_eq!(chain_key(999_999), None);
	}

	#[test]
	fn test_exact_in_uses_estimate_amounts() {
		let response: LifiQuoteResponse = serde_json::from_str(RESPONSE).unwrap();
		let quote = LifiSource::exact_in_quote(response).unwrap();
		assert_eq!(quote.amount_in, U256::from(1_000_000u64));
		assert_eq!(quote.amount_out, U256::from(499_000_000_000_000u64));
		assert_eq!(quote.amount_out_min, None);
		assert_eq!(quote.protocol, "LI.FI");
	}

	#[test]
	fn test_exact_out_uses_action_input_and_minimum() {
		let response: LifiQuoteResponse = serde_json::from_str(RESPONSE).unwrap();
		let quote = LifiSource::exact_out_quote(response).unwrap();
		assert_eq!(quote.amount_in, U256::from(1_005_000u64));
		assert_eq!(quote.amount_out_min, Some(U256::from(496_505_000_000_000u64)));
	}
}
