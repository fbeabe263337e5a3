//! Error types for calldata composition and amount math

use thiserror::Error;

/// Amount arithmetic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
	#[error("Invalid slippage: {bps} bps")]
	InvalidSlippage { bps: u32 },

	#[error("Arithmetic overflow in {operation}")]
	Overflow { operation: &'static str },

	#[error("Division by zero in {operation}")]
	DivisionByZero { operation: &'static str },
}

/// Composition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
	#[error(transparent)]
	Math(#[from] MathError),

	#[error("Verifier calldata too short: {len} bytes")]
	InvalidVerifierData { len: usize },
}

pub type ComposerResult<T> = Result<T, ComposerError>;
