//! Liquidity quote sources
//!
//! Each source wraps one aggregator or protocol HTTP API and normalizes its
//! answer into a `Quote` whose calldata targets the generic swapper handler.

pub mod client_cache;
pub mod kyberswap;
pub mod lifi;
pub mod one_inch;
pub mod pendle;
pub mod uniswap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;
use swap_types::constants::limits::DEFAULT_SOURCE_TIMEOUT_MS;
use swap_types::{parse_amount, Quote, SourceError, SourceResult, SwapRequest, U256};

pub use client_cache::{AuthConfig, ClientCache, ClientConfig};
pub use kyberswap::KyberSwapSource;
pub use lifi::LifiSource;
pub use one_inch::OneInchSource;
pub use pendle::PendleSource;
pub use uniswap::{UniswapQuote, UniswapRouter, UniswapSource};

/// Endpoint and credentials of one quote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
	pub base_url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
	/// Integrator / client id reported to the provider
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub referrer: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
	DEFAULT_SOURCE_TIMEOUT_MS
}

impl SourceConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			api_key: None,
			referrer: None,
			timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
		}
	}

	pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
		self.api_key = api_key;
		self
	}

	pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
		self.referrer = Some(referrer.into());
		self
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	/// Join `path` onto the base URL, keeping any base path prefix
	pub(crate) fn endpoint(&self, path: &str) -> SourceResult<String> {
		let mut base = Url::parse(&self.base_url).map_err(|e| SourceError::Config {
			reason: format!("Invalid base URL '{}': {}", self.base_url, e),
		})?;
		if !base.path().ends_with('/') {
			base.set_path(&format!("{}/", base.path()));
		}

		let joined = base
			.join(path.trim_start_matches('/'))
			.map_err(|e| SourceError::Config {
				reason: format!("Failed to join '{}' to '{}': {}", path, self.base_url, e),
			})?;
		Ok(joined.to_string())
	}
}

/// A liquidity provider able to quote swaps on some chains
#[async_trait]
pub trait QuoteSource: Send + Sync {
	/// Registry id of the source
	fn id(&self) -> &str;

	fn supports_chain(&self, chain_id: u64) -> bool;

	/// Whether `quote_exact_out` is implemented
	fn supports_exact_out(&self) -> bool {
		false
	}

	/// Whether the provider can send output straight to the receiver vault
	fn can_deliver_to_receiver(&self) -> bool {
		true
	}

	/// Quote selling exactly `request.amount` of `token_in`
	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote>;

	/// Quote buying exactly `request.amount` of `token_out`
	async fn quote_exact_out(&self, _request: &SwapRequest) -> SourceResult<Quote> {
		Err(SourceError::UnsupportedOperation {
			operation: "quote_exact_out".to_string(),
			source_id: self.id().to_string(),
		})
	}
}

/// Include / exclude lists over source ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFilter {
	#[serde(default, alias = "includeSources", skip_serializing_if = "Option::is_none")]
	pub include: Option<Vec<String>>,
	#[serde(default, alias = "excludeSources", skip_serializing_if = "Option::is_none")]
	pub exclude: Option<Vec<String>>,
}

impl SourceFilter {
	pub fn include(ids: &[&str]) -> Self {
		Self {
			include: Some(ids.iter().map(|id| id.to_string()).collect()),
			exclude: None,
		}
	}

	pub fn allows(&self, source_id: &str) -> bool {
		let included = self
			.include
			.as_ref()
			.map_or(true, |ids| ids.iter().any(|id| id == source_id));
		let excluded = self
			.exclude
			.as_ref()
			.is_some_and(|ids| ids.iter().any(|id| id == source_id));
		included && !excluded
	}
}

/// Quote sources by id
#[derive(Clone, Default)]
pub struct SourceRegistry {
	sources: HashMap<String, Arc<dyn QuoteSource>>,
}

impl SourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
		self.register(source);
		self
	}

	pub fn register(&mut self, source: Arc<dyn QuoteSource>) {
		self.sources.insert(source.id().to_string(), source);
	}

	pub fn get(&self, id: &str) -> Option<Arc<dyn QuoteSource>> {
		self.sources.get(id).cloned()
	}

	/// Sources allowed by `filter` that serve `chain_id`, ordered by id
	pub fn select(&self, filter: &SourceFilter, chain_id: u64) -> Vec<Arc<dyn QuoteSource>> {
		let mut selected: Vec<Arc<dyn QuoteSource>> = self
			.sources
			.values()
			.filter(|source| filter.allows(source.id()) && source.supports_chain(chain_id))
			.cloned()
			.collect();
		selected.sort_by(|a, b| a.id().cmp(b.id()));
		selected
	}

	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.sources.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}
}

/// Build a source from its registry id
pub fn create_source(id: &str, config: SourceConfig, cache: ClientCache) -> SourceResult<Arc<dyn QuoteSource>> {
	match id {
		one_inch::SOURCE_ID => Ok(Arc::new(OneInchSource::new(config, cache))),
		lifi::SOURCE_ID => Ok(Arc::new(LifiSource::new(config, cache))),
		kyberswap::SOURCE_ID => Ok(Arc::new(KyberSwapSource::new(config, cache))),
		pendle::SOURCE_ID => Ok(Arc::new(PendleSource::new(config, cache))),
		other => Err(SourceError::Config {
			reason: format!("unknown quote source '{}'", other),
		}),
	}
}

/// Send a request and decode a JSON body, mapping non-2xx statuses
pub(crate) async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> SourceResult<T> {
	let response = request.send().await?;
	let status = response.status();
	if !status.is_success() {
		return Err(SourceError::from_http_failure(status.as_u16()));
	}
	let body = response.text().await?;
	Ok(serde_json::from_str(&body)?)
}

/// Decimal amount field of a provider response
pub(crate) fn amount_field(value: &str, field: &str) -> SourceResult<U256> {
	parse_amount(value).map_err(|e| SourceError::invalid_response(format!("{}: {}", field, e)))
}

/// Slippage as a percentage string, e.g. 50 bps -> "0.5"
pub(crate) fn slippage_percent(bps: u32) -> String {
	(f64::from(bps) / 100.0).to_string()
}

/// Slippage as a fraction string, e.g. 50 bps -> "0.005"
pub(crate) fn slippage_fraction(bps: u32) -> String {
	(f64::from(bps) / 10_000.0).to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::StaticQuoteSource;

	#[test]
	fn test_source_filter() {
		let filter = SourceFilter {
			include: Some(vec!["1inch".to_string(), "lifi".to_string()]),
			exclude: Some(vec!["lifi".to_string()]),
		};
		assert!(filter.allows("1inch"));
		assert!(!filter.allows("lifi"));
		assert!(!filter.allows("kyberswap"));
		assert!(SourceFilter::default().allows("anything"));
	}

	#[test]
	fn test_registry_select_is_ordered_and_chain_scoped() {
		let registry = SourceRegistry::new()
			.with_source(Arc::new(StaticQuoteSource::new("zeta", 1)))
			.with_source(Arc::new(StaticQuoteSource::new("alpha", 1)))
			.with_source(Arc::new(StaticQuoteSource::new("other-chain", 1).on_chain(8453)));

		let ids: Vec<String> = registry
			.select(&SourceFilter::default(), 1)
			.iter()
			.map(|s| s.id().to_string())
			.collect();
		assert_eq!(ids, vec!["alpha", "zeta"]);
		assert_eq!(registry.select(&SourceFilter::include(&["zeta"]), 1).len(), 1);
	}

	#[test]
	fn test_unknown_source_id() {
		let result = create_source("nope", SourceConfig::new("http://localhost"), ClientCache::new());
		assert!(matches!(result, Err(SourceError::Config { .. })));
	}

	#[test]
	fn test_slippage_rendering() {
		assert_eq!(slippage_percent(50), "0.5");
		assert_eq!(slippage_percent(100), "1");
		assert_eq!(slippage_fraction(50), "0.005");
	}

	#[test]
	fn test_endpoint_joins_paths() {
		let config = SourceConfig::new("https://api.1inch.dev/");
		assert_eq!(config.endpoint("/swap").unwrap(), "https://api.1inch.dev/swap");

		let prefixed = SourceConfig::new("https://gateway.example.com/uniswap");
		assert_eq!(
			prefixed.endpoint("/quote").unwrap(),
			"https://gateway.example.com/uniswap/quote"
		);
	}

	#[test]
	fn test_invalid_base_url_is_config_error() {
		let config = SourceConfig::new("not a url");
		assert!(matches!(config.endpoint("/swap"), Err(SourceError::Config { .. })));
	}
}
