use axum::extract::{rejection::QueryRejection, Query, State};
use swap_types::SwapResult;
use tracing::info;

use crate::handlers::common::{ApiError, ApiResponse};
use crate::query::SwapQuery;
use crate::state::AppState;

fn parse(query: Result<Query<SwapQuery>, QueryRejection>) -> Result<swap_service::SwapParams, ApiError> {
	let Query(query) = query.map_err(|e| ApiError::bad_request(format!("Invalid parameters: {}", e)))?;
	query.parse().map_err(ApiError::bad_request)
}

/// GET /swap - Best swap for the request
pub async fn get_swap(
	State(state): State<AppState>,
	query: Result<Query<SwapQuery>, QueryRejection>,
) -> Result<ApiResponse<SwapResult>, ApiError> {
	let params = parse(query)?;
	info!(
		"Swap request on chain {}: {} -> {} ({})",
		params.chain_id, params.token_in, params.token_out, params.mode
	);

	let swap = state.swap_service.find_best_swap(params).await?;
	Ok(ApiResponse::success("Success", swap))
}

/// GET /swaps - All swaps found for the request, best first
pub async fn get_swaps(
	State(state): State<AppState>,
	query: Result<Query<SwapQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<SwapResult>>, ApiError> {
	let params = parse(query)?;
	info!(
		"Swaps request on chain {}: {} -> {} ({})",
		params.chain_id, params.token_in, params.token_out, params.mode
	);

	let swaps = state.swap_service.find_swaps(params).await?;
	Ok(ApiResponse::success("Success", swaps))
}
