//! Routing entry match filters
//!
//! Pure predicates over the request deciding whether a routing entry is
//! considered at all. Strategy-specific eligibility lives in
//! `Strategy::supports`.

use swap_types::{MatchFilter, SwapRequest};
use tracing::debug;

/// Trait for evaluating routing entry filters
#[cfg_attr(test, mockall::automock)]
pub trait RouteFilterTrait: Send + Sync {
	fn matches(&self, filter: &MatchFilter, request: &SwapRequest) -> bool;
}

/// Filter evaluating every present predicate of a `MatchFilter`
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteFilter;

impl RouteFilterTrait for RouteFilter {
	fn matches(&self, filter: &MatchFilter, request: &SwapRequest) -> bool {
		if let Some(modes) = &filter.modes {
			if !modes.contains(&request.mode) {
				debug!("Mode {} not in {:?}", request.mode, modes);
				return false;
			}
		}

		if let Some(is_repay) = filter.is_repay {
			if is_repay != request.is_repay {
				return false;
			}
		}

		if let Some(tokens) = &filter.tokens_in_or_out {
			if !tokens.iter().any(|token| request.involves_token(*token)) {
				return false;
			}
		}

		if let Some(excluded) = &filter.excluded_tokens {
			if excluded.iter().any(|token| request.involves_token(*token)) {
				debug!("Request touches an excluded token");
				return false;
			}
		}

		if let Some(is_principal_token) = filter.is_principal_token {
			if is_principal_token != request.involves_principal_token() {
				return false;
			}
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use swap_types::test_utils::{usdc, SwapRequestBuilder, USDC, WETH};
	use swap_types::{address, SwapperMode};

	#[test]
	fn test_empty_filter_matches_everything() {
		let filter = MatchFilter::default();
		assert!(RouteFilter.matches(&filter, &SwapRequestBuilder::new().build()));
		assert!(RouteFilter.matches(
			&filter,
			&SwapRequestBuilder::new().mode(SwapperMode::TargetDebt).repay(true).build()
		));
	}

	#[test]
	fn test_mode_and_repay_predicates() {
		let filter = MatchFilter::modes(&[SwapperMode::ExactIn]).with_repay(true);

		let repay = SwapRequestBuilder::new().repay(true).build();
		assert!(RouteFilter.matches(&filter, &repay));

		let plain = SwapRequestBuilder::new().build();
		assert!(!RouteFilter.matches(&filter, &plain));

		let target_debt = SwapRequestBuilder::new()
			.mode(SwapperMode::TargetDebt)
			.repay(true)
			.build();
		assert!(!RouteFilter.matches(&filter, &target_debt));
	}

	#[test]
	fn test_token_predicates() {
		let other = address!("dAC17F958D2ee523a2206206994597C13D831ec7");
		let request = SwapRequestBuilder::new().build();

		assert!(RouteFilter.matches(&MatchFilter::default().with_tokens(vec![WETH]), &request));
		assert!(!RouteFilter.matches(&MatchFilter::default().with_tokens(vec![other]), &request));

		let excluded = MatchFilter {
			excluded_tokens: Some(vec![USDC]),
			..Default::default()
		};
		assert!(!RouteFilter.matches(&excluded, &request));

		let excluded_other = MatchFilter {
			excluded_tokens: Some(vec![other]),
			..Default::default()
		};
		assert!(RouteFilter.matches(&excluded_other, &request));
	}

	#[test]
	fn test_principal_token_predicate() {
		let filter = MatchFilter {
			is_principal_token: Some(true),
			..Default::default()
		};
		assert!(!RouteFilter.matches(&filter, &SwapRequestBuilder::new().build()));

		let market = address!("4339ffe2b7592dc783ed13cce310531ab366deac");
		let pt = usdc().with_principal_market(market);
		let request = SwapRequestBuilder::new().token_out(pt).build();
		assert!(RouteFilter.matches(&filter, &request));
	}

	#[test]
	fn test_mock_filter() {
		let mut mock = MockRouteFilterTrait::new();
		mock.expect_matches().times(1).returning(|_, _| false);
		assert!(!mock.matches(&MatchFilter::default(), &SwapRequestBuilder::new().build()));
	}
}
