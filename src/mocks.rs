//! Deterministic fixtures for demos and integration tests
//!
//! A builder wired to in-memory quote sources, vault previews and token
//! lists so the full pipeline runs without network access.

use std::sync::Arc;

use swap_service::RoutingTable;
use swap_strategies::test_utils::{StaticChainReader, StaticQuoteSource, StaticUniswapRouter};
use swap_types::test_utils::{usdc, weth, TEST_CHAIN_ID};
use swap_types::{MatchFilter, RoutingConfig, RoutingEntry, SwapperMode, TokenList};

use crate::config::Settings;
use crate::RouterBuilder;

/// Tokens known to the mock pipeline: USDC and WETH on mainnet
pub fn mock_tokens() -> TokenList {
	TokenList::from_tokens(vec![usdc(), weth()])
}

/// Default settings on the loopback interface
pub fn mock_settings() -> Settings {
	let mut settings = Settings::default();
	settings.server.host = "127.0.0.1".to_string();
	settings
}

/// Repay wrapper for exact-input repays, then every source in parallel
pub fn mock_routing() -> RoutingConfig {
	vec![
		RoutingEntry::new("repay_wrapper")
			.with_filter(MatchFilter::modes(&[SwapperMode::ExactIn]).with_repay(true)),
		RoutingEntry::new("multi_source"),
	]
}

pub fn mock_routing_table() -> RoutingTable {
	RoutingTable::default().with_chain(TEST_CHAIN_ID, mock_routing())
}

/// `1inch` answering 200 for every exact-input quote
pub fn mock_source() -> StaticQuoteSource {
	StaticQuoteSource::new("1inch", 200)
}

/// Builder over the mock tokens and routing, pricing through `sources`
pub fn mock_builder(sources: Vec<StaticQuoteSource>) -> RouterBuilder {
	sources
		.into_iter()
		.fold(RouterBuilder::new(), |builder, source| {
			builder.with_source(Arc::new(source))
		})
		.with_settings(mock_settings())
		.with_tokens(mock_tokens())
		.with_chain_reader(Arc::new(StaticChainReader::new(1, 1)))
		.with_uniswap(Arc::new(StaticUniswapRouter::new(1, 1)))
		.with_routing_table(mock_routing_table())
}
