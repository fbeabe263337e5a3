use axum::extract::State;
use serde::Serialize;

use crate::handlers::common::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
	pub status: &'static str,
	pub chains: Vec<u64>,
	pub strategies: Vec<String>,
}

/// GET /health - Liveness with the configured chains and strategies
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
	ApiResponse::success(
		"Service is healthy",
		HealthStatus {
			status: "healthy",
			chains: state.swap_service.chain_ids(),
			strategies: state.swap_service.registry().ids(),
		},
	)
}
