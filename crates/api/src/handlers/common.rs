//! Response envelope shared by handlers

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use swap_service::SwapServiceError;
use tracing::warn;

/// `{success, message, data, statusCode}` envelope of every response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub success: bool,
	pub message: String,
	pub data: Option<T>,
	pub status_code: u16,
}

impl<T: Serialize> ApiResponse<T> {
	pub fn success(message: &str, data: T) -> Self {
		Self {
			success: true,
			message: message.to_string(),
			data: Some(data),
			status_code: StatusCode::OK.as_u16(),
		}
	}
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
	fn into_response(self) -> Response {
		let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self)).into_response()
	}
}

/// Failed request, rendered as an envelope without data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
	pub status: StatusCode,
	pub message: String,
}

impl ApiError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST,
			message: message.into(),
		}
	}
}

impl From<SwapServiceError> for ApiError {
	fn from(error: SwapServiceError) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		Self {
			status,
			message: error.to_string(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		warn!("Request failed with {}: {}", self.status, self.message);
		ApiResponse::<()> {
			success: false,
			message: self.message,
			data: None,
			status_code: self.status.as_u16(),
		}
		.into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_types::RouterError;

	#[test]
	fn test_envelope_shape() {
		let body = serde_json::to_value(ApiResponse::success("ok", 5)).unwrap();
		assert_eq!(body["success"], true);
		assert_eq!(body["data"], 5);
		assert_eq!(body["statusCode"], 200);
	}

	#[test]
	fn test_service_errors_keep_their_status() {
		let error = ApiError::from(SwapServiceError::Router(RouterError::ConfigMissing {
			chain_id: 10,
		}));
		assert_eq!(error.status, StatusCode::NOT_FOUND);
		assert_eq!(error.message, "Routing config not found for chain 10");

		let error = ApiError::from(SwapServiceError::Router(RouterError::ConvergenceExceeded {
			iterations: 15,
		}));
		assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
	}
}
