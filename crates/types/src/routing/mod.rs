//! Routing configuration models
//!
//! A chain's `RoutingConfig` is an ordered list of entries, each naming a
//! strategy, the requests it applies to, and strategy-specific configuration.

pub mod errors;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::swaps::{SwapRequest, SwapResult, SwapperMode};

pub use errors::RouterError;

/// Declarative predicates selecting which requests an entry handles.
///
/// Every present predicate must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilter {
	#[serde(default, alias = "swapperModes", skip_serializing_if = "Option::is_none")]
	pub modes: Option<Vec<SwapperMode>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_repay: Option<bool>,
	/// At least one side of the trade must be listed
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tokens_in_or_out: Option<Vec<Address>>,
	/// Neither side of the trade may be listed
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub excluded_tokens: Option<Vec<Address>>,
	#[serde(default, alias = "isPendlePT", skip_serializing_if = "Option::is_none")]
	pub is_principal_token: Option<bool>,
}

impl MatchFilter {
	pub fn modes(modes: &[SwapperMode]) -> Self {
		Self {
			modes: Some(modes.to_vec()),
			..Default::default()
		}
	}

	pub fn with_repay(mut self, is_repay: bool) -> Self {
		self.is_repay = Some(is_repay);
		self
	}

	pub fn with_tokens(mut self, tokens: Vec<Address>) -> Self {
		self.tokens_in_or_out = Some(tokens);
		self
	}

	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// One routing step: a strategy id with its filter and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingEntry {
	pub strategy: String,
	#[serde(default, rename = "match")]
	pub filter: MatchFilter,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub config: Option<serde_json::Value>,
}

impl RoutingEntry {
	pub fn new(strategy: impl Into<String>) -> Self {
		Self {
			strategy: strategy.into(),
			filter: MatchFilter::default(),
			config: None,
		}
	}

	pub fn with_filter(mut self, filter: MatchFilter) -> Self {
		self.filter = filter;
		self
	}

	pub fn with_config(mut self, config: serde_json::Value) -> Self {
		self.config = Some(config);
		self
	}
}

/// Ordered routing entries of one chain
pub type RoutingConfig = Vec<RoutingEntry>;

/// Diagnostic record of one routing entry evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOutcome {
	pub strategy: String,
	pub matched: bool,
	pub supported: bool,
	pub quotes: Vec<SwapResult>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl StrategyOutcome {
	pub fn unmatched(strategy: &str) -> Self {
		Self {
			strategy: strategy.to_string(),
			matched: false,
			supported: false,
			quotes: Vec::new(),
			error: None,
		}
	}

	pub fn unsupported(strategy: &str) -> Self {
		Self {
			matched: true,
			..Self::unmatched(strategy)
		}
	}

	pub fn completed(strategy: &str, quotes: Vec<SwapResult>) -> Self {
		Self {
			matched: true,
			supported: true,
			quotes,
			..Self::unmatched(strategy)
		}
	}

	pub fn failed(strategy: &str, error: impl ToString) -> Self {
		Self {
			error: Some(error.to_string()),
			..Self::completed(strategy, Vec::new())
		}
	}

	/// Whether the strategy was actually invoked
	pub fn attempted(&self) -> bool {
		self.matched && self.supported
	}
}

/// Summary of a request used in log lines
pub fn describe(request: &SwapRequest) -> String {
	format!(
		"chain={} {} {} -> {} amount={} depth={}",
		request.chain_id,
		request.mode,
		request.token_in.address,
		request.token_out.address,
		request.amount,
		request.depth
	)
}
