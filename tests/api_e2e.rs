//! HTTP end-to-end tests

mod mocks;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use swap_router::strategies::test_utils::StaticQuoteSource;

use crate::mocks::fixtures::{exact_in_query, with_param};
use crate::mocks::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
	let server = TestServer::spawn()
		.await
		.expect("Failed to start test server");
	let client = Client::new();

	let resp = client
		.get(format!("{}/health", server.base_url))
		.send()
		.await
		.unwrap();

	assert!(resp.status().is_success());
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], true);
	assert_eq!(body["data"]["status"], "healthy");
	assert_eq!(body["data"]["chains"], serde_json::json!([1]));

	server.abort();
}

#[tokio::test]
async fn test_swap_returns_best_quote() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let resp = client
		.get(format!("{}/swap", server.base_url))
		.query(&exact_in_query())
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], true);
	assert_eq!(body["statusCode"], 200);
	assert_eq!(body["data"]["amountIn"], "100");
	assert_eq!(body["data"]["amountOut"], "200");
	assert_eq!(body["data"]["amountOutMin"], "199");
	assert_eq!(body["data"]["verify"]["type"], "skimMin");
	assert_eq!(body["data"]["route"][0]["providerName"], "1inch");

	server.abort();
}

#[tokio::test]
async fn test_swaps_returns_all_quotes() {
	let server = TestServer::spawn_with_sources(vec![
		StaticQuoteSource::new("1inch", 200),
		StaticQuoteSource::new("kyberswap", 250),
	])
	.await
	.unwrap();
	let client = Client::new();

	let resp = client
		.get(format!("{}/swaps", server.base_url))
		.query(&exact_in_query())
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = resp.json().await.unwrap();
	let swaps = body["data"].as_array().unwrap();
	assert_eq!(swaps.len(), 2);
	assert_eq!(swaps[0]["amountOut"], "250");
	assert_eq!(swaps[1]["amountOut"], "200");

	server.abort();
}

#[tokio::test]
async fn test_invalid_query_is_bad_request() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let query = with_param(exact_in_query(), "tokenIn", "0xnotanaddress");
	let query = with_param(query, "slippage", "75");
	let resp = client
		.get(format!("{}/swap", server.base_url))
		.query(&query)
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert_eq!(body["statusCode"], 400);
	let message = body["message"].as_str().unwrap();
	assert!(message.starts_with("Invalid parameters"));
	assert!(message.contains("tokenIn") || message.contains("0xnotanaddress"));

	server.abort();
}

#[tokio::test]
async fn test_missing_parameter_is_bad_request() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let mut query = exact_in_query();
	query.retain(|(key, _)| *key != "chainId");
	let resp = client
		.get(format!("{}/swap", server.base_url))
		.query(&query)
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	server.abort();
}

#[tokio::test]
async fn test_unrouted_chain_is_not_found() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let resp = client
		.get(format!("{}/swap", server.base_url))
		.query(&with_param(exact_in_query(), "chainId", "10"))
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["success"], false);
	assert!(body["data"].is_null());

	server.abort();
}

#[tokio::test]
async fn test_unknown_override_strategy_is_bad_request() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let routing = r#"[{"strategy":"balmy"}]"#;
	let resp = client
		.get(format!("{}/swap", server.base_url))
		.query(&with_param(exact_in_query(), "routingOverride", routing))
		.send()
		.await
		.unwrap();

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	server.abort();
}

#[tokio::test]
async fn test_security_headers_are_set() {
	let server = TestServer::spawn().await.unwrap();
	let client = Client::new();

	let resp = client
		.get(format!("{}/health", server.base_url))
		.send()
		.await
		.unwrap();

	assert!(resp.headers().contains_key("x-content-type-options"));
	assert!(resp.headers().contains_key("x-request-id"));
	server.abort();
}
