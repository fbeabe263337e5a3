//! Error types for routing pipeline operations

use thiserror::Error;

use super::StrategyOutcome;

/// Routing pipeline errors
#[derive(Error, Debug, Clone)]
pub enum RouterError {
	#[error("Routing config not found for chain {chain_id}")]
	ConfigMissing { chain_id: u64 },

	#[error("No routing entry supports the request")]
	NotSupported { trace: Vec<StrategyOutcome> },

	#[error("Swap quote not found")]
	QuoteNotFound { trace: Vec<StrategyOutcome> },

	#[error("Quote search not completed in {iterations} iterations")]
	ConvergenceExceeded { iterations: u32 },

	#[error("Invalid request: {reason}")]
	InvalidRequest { reason: String },

	#[error("Unknown strategy: {strategy}")]
	UnknownStrategy { strategy: String },

	#[error("Request deadline of {timeout_ms}ms exceeded")]
	DeadlineExceeded { timeout_ms: u64 },

	#[error("Routing depth limit {max_depth} reached")]
	RecursionLimit { max_depth: u32 },

	#[error("Internal error: {0}")]
	Internal(String),
}

impl RouterError {
	/// HTTP status the error maps to
	pub fn status_code(&self) -> u16 {
		match self {
			Self::ConfigMissing { .. } | Self::NotSupported { .. } | Self::QuoteNotFound { .. } => {
				404
			},
			Self::InvalidRequest { .. } | Self::UnknownStrategy { .. } => 400,
			Self::ConvergenceExceeded { .. }
			| Self::DeadlineExceeded { .. }
			| Self::RecursionLimit { .. }
			| Self::Internal(_) => 500,
		}
	}

	/// "No route" outcomes that wrapper strategies treat as an empty result
	pub fn is_no_route(&self) -> bool {
		matches!(self, Self::NotSupported { .. } | Self::QuoteNotFound { .. })
	}

	/// Diagnostic trace of attempted entries, for operator logs only
	pub fn trace(&self) -> Option<&[StrategyOutcome]> {
		match self {
			Self::NotSupported { trace } | Self::QuoteNotFound { trace } => Some(trace),
			_ => None,
		}
	}

	pub fn invalid(reason: impl Into<String>) -> Self {
		Self::InvalidRequest {
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_code_mapping() {
		assert_eq!(RouterError::ConfigMissing { chain_id: 1 }.status_code(), 404);
		assert_eq!(RouterError::QuoteNotFound { trace: vec![] }.status_code(), 404);
		assert_eq!(RouterError::NotSupported { trace: vec![] }.status_code(), 404);
		assert_eq!(RouterError::invalid("bad slippage").status_code(), 400);
		assert_eq!(
			RouterError::ConvergenceExceeded { iterations: 15 }.status_code(),
			500
		);
	}

	#[test]
	fn test_trace_is_not_part_of_message() {
		let error = RouterError::QuoteNotFound {
			trace: vec![StrategyOutcome::failed("secret_strategy", "upstream detail")],
		};
		assert_eq!(error.to_string(), "Swap quote not found");
		assert_eq!(error.trace().map(|t| t.len()), Some(1));
		assert!(error.is_no_route());
	}
}
