//! Error types for quote source operations

use thiserror::Error;

/// Quote source operation errors
#[derive(Error, Debug)]
pub enum SourceError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatus { status_code: u16, reason: String },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Chain not supported: {chain_id} by source {source_id}")]
	ChainNotSupported { chain_id: u64, source_id: String },

	#[error("Unsupported operation: {operation} for source {source_id}")]
	UnsupportedOperation {
		operation: String,
		source_id: String,
	},

	#[error("Configuration error: {reason}")]
	Config { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for quote source operations
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			SourceError::HttpStatus { status_code, .. } => Some(*status_code),
			SourceError::Http(reqwest_error) => reqwest_error.status().map(|s| s.as_u16()),
			_ => None,
		}
	}

	/// Create an HTTP failure error from response status with default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatus {
			status_code,
			reason,
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_source_error_status_code_extraction() {
		let error = SourceError::HttpStatus {
			status_code: 404,
			reason: "Not Found".to_string(),
		};
		assert_eq!(error.status_code(), Some(404));

		let error = SourceError::from_http_failure(429);
		assert_eq!(error.status_code(), Some(429));
		assert!(error.to_string().contains("Too Many Requests"));

		let error = SourceError::invalid_response("missing tx");
		assert_eq!(error.status_code(), None);
	}
}
