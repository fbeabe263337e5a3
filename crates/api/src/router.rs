use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{get_swap, get_swaps, health};
use crate::security::add_security_headers;
use crate::state::AppState;

/// Body limit of the GET-only surface
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

pub fn create_router() -> Router<AppState> {
	create_router_with_body_limit(DEFAULT_BODY_LIMIT)
}

pub fn create_router_with_body_limit(body_limit: usize) -> Router<AppState> {
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/health/", get(health))
		.route("/swap", get(get_swap))
		.route("/swap/", get(get_swap))
		.route("/swaps", get(get_swaps))
		.route("/swaps/", get(get_swaps))
		.layer(CorsLayer::permissive())
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(RequestBodyLimitLayer::new(body_limit));

	add_security_headers(router)
}
