//! Error types for strategy operations

use swap_composer::{ComposerError, MathError};
use swap_types::{RouterError, SourceError};
use thiserror::Error;

use crate::chain::ChainReadError;

/// Strategy operation errors
#[derive(Error, Debug)]
pub enum StrategyError {
	#[error("Quote source error: {0}")]
	Source(#[from] SourceError),

	#[error("Amount math error: {0}")]
	Math(#[from] MathError),

	#[error("Composition error: {0}")]
	Composer(#[from] ComposerError),

	#[error("Chain read error: {0}")]
	ChainRead(#[from] ChainReadError),

	#[error("Inner routing failed: {0}")]
	Pipeline(#[from] RouterError),

	#[error("Quote not found: {reason}")]
	QuoteNotFound { reason: String },

	#[error("Quote search not completed in {iterations} iterations")]
	ConvergenceExceeded { iterations: u32 },

	#[error("Invalid configuration for {strategy}: {reason}")]
	InvalidConfig { strategy: String, reason: String },

	#[error("No {contract} contract configured for chain {chain_id}")]
	MissingContract {
		chain_id: u64,
		contract: &'static str,
	},

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },
}

/// Result type for strategy operations
pub type StrategyResult<T> = Result<T, StrategyError>;

impl StrategyError {
	pub fn quote_not_found(reason: impl Into<String>) -> Self {
		Self::QuoteNotFound {
			reason: reason.into(),
		}
	}

	pub fn invalid_config(strategy: &str, reason: impl Into<String>) -> Self {
		Self::InvalidConfig {
			strategy: strategy.to_string(),
			reason: reason.into(),
		}
	}

	/// Search iteration budget exhausted here or in a nested pipeline call
	pub fn is_convergence_exceeded(&self) -> bool {
		matches!(
			self,
			Self::ConvergenceExceeded { .. } | Self::Pipeline(RouterError::ConvergenceExceeded { .. })
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_convergence_detection_through_pipeline() {
		assert!(StrategyError::ConvergenceExceeded { iterations: 15 }.is_convergence_exceeded());
		assert!(StrategyError::from(RouterError::ConvergenceExceeded { iterations: 15 })
			.is_convergence_exceeded());
		assert!(!StrategyError::quote_not_found("zero output").is_convergence_exceeded());
	}
}
