//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use swap_types::constants::limits::{
	BPS_DENOMINATOR, DEFAULT_ENTRY_TIMEOUT_MS, DEFAULT_INTEREST_BUFFER_BPS, DEFAULT_MAX_ROUTING_DEPTH,
	DEFAULT_OVERSWAP_TOLERANCE_BPS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SOURCE_TIMEOUT_MS,
	DEFAULT_UNDERSWAP_TOLERANCE_BPS, MIN_SOURCE_TIMEOUT_MS,
};
use swap_types::{address, Address, ChainContracts, ContractBook};
use thiserror::Error;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub logging: LoggingSettings,
	pub timeouts: TimeoutSettings,
	pub tuning: TuningSettings,
	pub chains: Vec<ChainSettings>,
	/// Quote source settings keyed by source id
	pub sources: BTreeMap<String, SourceSettings>,
	/// JSON routing table keyed by chain id
	pub routing_path: String,
	/// Directory of `<chain id>.json` token lists
	pub tokens_dir: String,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
	#[serde(default = "default_body_limit")]
	pub max_request_size: usize,
}

fn default_body_limit() -> usize {
	64 * 1024
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Timeout configuration, all in milliseconds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeoutSettings {
	/// Whole request, nested pipeline calls included
	pub request_ms: u64,
	/// One routing entry
	pub entry_ms: u64,
	/// One quote source call
	pub source_ms: u64,
	/// One JSON-RPC call
	#[serde(default = "default_rpc_ms")]
	pub rpc_ms: u64,
}

fn default_rpc_ms() -> u64 {
	5_000
}

/// Numeric knobs of the strategies and the pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TuningSettings {
	pub interest_buffer_bps: u32,
	pub overswap_tolerance_bps: u32,
	pub underswap_tolerance_bps: u32,
	pub max_routing_depth: u32,
}

/// Contracts and RPC endpoint of one chain
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainSettings {
	pub chain_id: u64,
	pub swapper: Address,
	pub verifier: Address,
	#[serde(default)]
	pub rpc_url: Option<ConfigurableValue>,
}

/// Endpoint and credentials of one quote source
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceSettings {
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	pub base_url: String,
	#[serde(default)]
	pub api_key: Option<ConfigurableValue>,
	#[serde(default)]
	pub referrer: Option<String>,
	/// Overrides `timeouts.source_ms`
	#[serde(default)]
	pub timeout_ms: Option<u64>,
}

fn default_enabled() -> bool {
	true
}

impl SourceSettings {
	pub fn new(base_url: &str) -> Self {
		Self {
			enabled: true,
			base_url: base_url.to_string(),
			api_key: None,
			referrer: None,
			timeout_ms: None,
		}
	}

	pub fn with_api_key(mut self, api_key: ConfigurableValue) -> Self {
		self.api_key = Some(api_key);
		self
	}

	/// API key, absent when unset or its variable is missing
	pub fn resolve_api_key(&self) -> Result<Option<String>, ConfigurableValueError> {
		match &self.api_key {
			Some(value) => value.resolve_optional(),
			None => Ok(None),
		}
	}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
	#[error("server.port must not be 0")]
	InvalidPort,

	#[error("timeouts.{field} must be at least {min}ms")]
	TimeoutTooShort { field: &'static str, min: u64 },

	#[error("timeouts.entry_ms ({entry_ms}) exceeds timeouts.request_ms ({request_ms})")]
	EntryExceedsRequest { entry_ms: u64, request_ms: u64 },

	#[error("tuning.{field} must be below {max} bps")]
	TuningOutOfRange { field: &'static str, max: u64 },

	#[error("tuning.max_routing_depth must be positive")]
	InvalidDepth,

	#[error("chain {0} is configured twice")]
	DuplicateChain(u64),

	#[error("source '{0}' has an empty base_url")]
	EmptySourceUrl(String),
}

impl Default for Settings {
	fn default() -> Self {
		let mut sources = BTreeMap::new();
		sources.insert(
			"1inch".to_string(),
			SourceSettings::new("https://api.1inch.dev")
				.with_api_key(ConfigurableValue::from_env("ONE_INCH_API_KEY")),
		);
		sources.insert(
			"lifi".to_string(),
			SourceSettings::new("https://li.quest")
				.with_api_key(ConfigurableValue::from_env("LIFI_API_KEY")),
		);
		sources.insert(
			"kyberswap".to_string(),
			SourceSettings::new("https://aggregator-api.kyberswap.com"),
		);
		sources.insert(
			"pendle".to_string(),
			SourceSettings::new("https://api-v2.pendle.finance")
				.with_api_key(ConfigurableValue::from_env("PENDLE_API_KEY")),
		);
		sources.insert(
			"uniswap".to_string(),
			SourceSettings::new("http://localhost:3002"),
		);

		Self {
			server: ServerSettings {
				host: "0.0.0.0".to_string(),
				port: 3000,
				max_request_size: default_body_limit(),
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
				structured: false,
			},
			timeouts: TimeoutSettings {
				request_ms: DEFAULT_REQUEST_TIMEOUT_MS,
				entry_ms: DEFAULT_ENTRY_TIMEOUT_MS,
				source_ms: DEFAULT_SOURCE_TIMEOUT_MS,
				rpc_ms: default_rpc_ms(),
			},
			tuning: TuningSettings {
				interest_buffer_bps: DEFAULT_INTEREST_BUFFER_BPS,
				overswap_tolerance_bps: DEFAULT_OVERSWAP_TOLERANCE_BPS,
				underswap_tolerance_bps: DEFAULT_UNDERSWAP_TOLERANCE_BPS,
				max_routing_depth: DEFAULT_MAX_ROUTING_DEPTH,
			},
			chains: vec![ChainSettings {
				chain_id: 1,
				swapper: address!("2Bba09866b6F1025258542478C39720A09B728bF"),
				verifier: address!("ae26485ACDDeFd486Fe9ad7C2b34169d360737c7"),
				rpc_url: Some(ConfigurableValue::from_env("RPC_HTTP_1")),
			}],
			sources,
			routing_path: "config/routing.json".to_string(),
			tokens_dir: "config/tokens".to_string(),
		}
	}
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Enabled quote sources only
	pub fn enabled_sources(&self) -> BTreeMap<String, SourceSettings> {
		self.sources
			.iter()
			.filter(|(_, source)| source.enabled)
			.map(|(id, source)| (id.clone(), source.clone()))
			.collect()
	}

	pub fn contract_book(&self) -> ContractBook {
		self.chains
			.iter()
			.fold(ContractBook::new(), |book, chain| {
				book.with_chain(
					chain.chain_id,
					ChainContracts {
						swapper: chain.swapper,
						verifier: chain.verifier,
					},
				)
			})
	}

	/// RPC URLs of the chains whose endpoint resolves
	pub fn rpc_endpoints(&self) -> Result<HashMap<u64, String>, ConfigurableValueError> {
		let mut endpoints = HashMap::new();
		for chain in &self.chains {
			if let Some(url) = &chain.rpc_url {
				if let Some(url) = url.resolve_optional()? {
					endpoints.insert(chain.chain_id, url);
				}
			}
		}
		Ok(endpoints)
	}

	/// Effective timeout of a source
	pub fn source_timeout_ms(&self, source: &SourceSettings) -> u64 {
		source.timeout_ms.unwrap_or(self.timeouts.source_ms)
	}

	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.server.port == 0 {
			return Err(ConfigValidationError::InvalidPort);
		}

		let timeouts = &self.timeouts;
		for (field, value) in [
			("request_ms", timeouts.request_ms),
			("entry_ms", timeouts.entry_ms),
			("source_ms", timeouts.source_ms),
			("rpc_ms", timeouts.rpc_ms),
		] {
			if value < MIN_SOURCE_TIMEOUT_MS {
				return Err(ConfigValidationError::TimeoutTooShort {
					field,
					min: MIN_SOURCE_TIMEOUT_MS,
				});
			}
		}
		if timeouts.entry_ms > timeouts.request_ms {
			return Err(ConfigValidationError::EntryExceedsRequest {
				entry_ms: timeouts.entry_ms,
				request_ms: timeouts.request_ms,
			});
		}

		let tuning = &self.tuning;
		for (field, value) in [
			("interest_buffer_bps", tuning.interest_buffer_bps),
			("overswap_tolerance_bps", tuning.overswap_tolerance_bps),
			("underswap_tolerance_bps", tuning.underswap_tolerance_bps),
		] {
			if u64::from(value) >= BPS_DENOMINATOR {
				return Err(ConfigValidationError::TuningOutOfRange {
					field,
					max: BPS_DENOMINATOR,
				});
			}
		}
		if tuning.max_routing_depth == 0 {
			return Err(ConfigValidationError::InvalidDepth);
		}

		let mut seen = HashSet::new();
		for chain in &self.chains {
			if !seen.insert(chain.chain_id) {
				return Err(ConfigValidationError::DuplicateChain(chain.chain_id));
			}
		}

		for (id, source) in &self.sources {
			if source.base_url.trim().is_empty() {
				return Err(ConfigValidationError::EmptySourceUrl(id.clone()));
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
		assert_eq!(settings.tuning.interest_buffer_bps, 1);
		assert_eq!(settings.tuning.overswap_tolerance_bps, 50);
		assert_eq!(
			settings.contract_book().swapper(1),
			Some(address!("2Bba09866b6F1025258542478C39720A09B728bF"))
		);
	}

	#[test]
	fn test_validation_failures() {
		let mut settings = Settings::default();
		settings.timeouts.entry_ms = settings.timeouts.request_ms + 1;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::EntryExceedsRequest { .. })
		));

		let mut settings = Settings::default();
		settings.tuning.overswap_tolerance_bps = 10_000;
		assert_eq!(
			settings.validate(),
			Err(ConfigValidationError::TuningOutOfRange {
				field: "overswap_tolerance_bps",
				max: 10_000
			})
		);

		let mut settings = Settings::default();
		let duplicate = settings.chains[0].clone();
		settings.chains.push(duplicate);
		assert_eq!(settings.validate(), Err(ConfigValidationError::DuplicateChain(1)));
	}

	#[test]
	fn test_disabled_sources_are_filtered() {
		let mut settings = Settings::default();
		if let Some(lifi) = settings.sources.get_mut("lifi") {
			lifi.enabled = false;
		}
		let enabled = settings.enabled_sources();
		assert!(!enabled.contains_key("lifi"));
		assert!(enabled.contains_key("1inch"));
	}

	#[test]
	fn test_rpc_endpoints_skip_unset_variables() {
		let mut settings = Settings::default();
		settings.chains[0].rpc_url = Some(ConfigurableValue::from_env("SWAP_ROUTER_TEST_UNSET_RPC"));
		settings.chains.push(ChainSettings {
			chain_id: 8453,
			swapper: Address::ZERO,
			verifier: Address::ZERO,
			rpc_url: Some(ConfigurableValue::from_plain("http://localhost:8545")),
		});
		let endpoints = settings.rpc_endpoints().unwrap();
		assert_eq!(endpoints.len(), 1);
		assert_eq!(endpoints.get(&8453).map(String::as_str), Some("http://localhost:8545"));
	}

	#[test]
	fn test_source_timeout_override() {
		let settings = Settings::default();
		let mut source = SourceSettings::new("https://example.org");
		assert_eq!(settings.source_timeout_ms(&source), settings.timeouts.source_ms);
		source.timeout_ms = Some(1_500);
		assert_eq!(settings.source_timeout_ms(&source), 1_500);
	}
}
