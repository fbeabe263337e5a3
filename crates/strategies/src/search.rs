//! Convergence search over exact-input quotes
//!
//! Finds an input amount whose exact-input quote lands inside a band around a
//! target output, by scaling the input with the relative output error.

use std::future::Future;

use swap_types::constants::limits::{BPS_DENOMINATOR, MAX_SEARCH_ITERATIONS};
use swap_types::U256;
use tracing::debug;

use crate::errors::{StrategyError, StrategyResult};

/// Result of a converged search
#[derive(Debug, Clone)]
pub struct SearchOutcome<Q> {
	pub quote: Q,
	pub amount_from: U256,
	pub amount_to: U256,
	pub iterations: u32,
}

fn overflow() -> StrategyError {
	StrategyError::Math(swap_composer::MathError::Overflow {
		operation: "search",
	})
}

/// Scale factor (in bps) moving the next input towards `target`, with a
/// 1 bp nudge in the direction of the error
fn next_adjustment(to: U256, target: U256) -> StrategyResult<U256> {
	let bps = U256::from(BPS_DENOMINATOR);
	let one = U256::from(1u64);
	if to > target {
		let relative = (to - target).checked_mul(bps).ok_or_else(overflow)? / target + one;
		Ok(if relative >= bps {
			relative - bps
		} else {
			bps - relative
		})
	} else {
		let relative = (target - to).checked_mul(bps).ok_or_else(overflow)? / to;
		Ok(relative + bps + one)
	}
}

/// Iterate `quote_fn` until `continue_fn` accepts the output.
///
/// Fails with `QuoteNotFound` on a zero output or target and with
/// `ConvergenceExceeded` after `MAX_SEARCH_ITERATIONS` quotes.
pub async fn search<Q, F, Fut, C>(
	target: U256,
	initial_from: U256,
	mut quote_fn: F,
	continue_fn: C,
) -> StrategyResult<SearchOutcome<Q>>
where
	F: FnMut(U256) -> Fut,
	Fut: Future<Output = StrategyResult<(Q, U256)>>,
	C: Fn(U256) -> bool,
{
	let bps = U256::from(BPS_DENOMINATOR);
	let mut adjustment = bps;
	let mut amount_from = initial_from;
	let mut iterations = 0u32;

	loop {
		amount_from = amount_from.checked_mul(adjustment).ok_or_else(overflow)? / bps;
		let (quote, amount_to) = quote_fn(amount_from).await?;

		if amount_to.is_zero() || target.is_zero() {
			return Err(StrategyError::quote_not_found("search quote returned zero"));
		}

		adjustment = next_adjustment(amount_to, target)?;
		iterations += 1;
		debug!(
			"Search iteration {}: from={} to={} target={}",
			iterations, amount_from, amount_to, target
		);

		if !continue_fn(amount_to) {
			return Ok(SearchOutcome {
				quote,
				amount_from,
				amount_to,
				iterations,
			});
		}
		if iterations >= MAX_SEARCH_ITERATIONS {
			return Err(StrategyError::ConvergenceExceeded { iterations });
		}
	}
}

fn ratio_bps(to: U256, target: U256) -> Option<U256> {
	if target.is_zero() {
		return None;
	}
	to.checked_mul(U256::from(BPS_DENOMINATOR)).map(|scaled| scaled / target)
}

/// Continue while the output is below target or more than `tolerance_bps` above it
pub fn overswap_band(target: U256, tolerance_bps: u32) -> impl Fn(U256) -> bool {
	let ceiling = U256::from(BPS_DENOMINATOR + u64::from(tolerance_bps));
	move |to| to < target || ratio_bps(to, target).map_or(true, |ratio| ratio > ceiling)
}

/// Continue while the output is above target or more than `tolerance_bps` below it
pub fn underswap_band(target: U256, tolerance_bps: u32) -> impl Fn(U256) -> bool {
	let floor = U256::from(BPS_DENOMINATOR.saturating_sub(u64::from(tolerance_bps)));
	move |to| to > target || ratio_bps(to, target).map_or(true, |ratio| ratio < floor)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	/// Output = input * rate / 1e6, a monotonic synthetic curve
	async fn linear(from: U256, rate: u64) -> StrategyResult<((), U256)> {
		Ok(((), from * U256::from(rate) / U256::from(1_000_000u64)))
	}

	#[tokio::test]
	async fn test_overswap_search_converges_inside_band() {
		let target = U256::from(1_000_000_000u64);
		let calls = AtomicU32::new(0);
		let outcome = search(
			target,
			U256::from(600_000_000u64),
			|from| {
				calls.fetch_add(1, Ordering::SeqCst);
				linear(from, 1_730_000)
			},
			overswap_band(target, 50),
		)
		.await
		.unwrap();

		assert!(outcome.iterations <= MAX_SEARCH_ITERATIONS);
		assert_eq!(outcome.iterations, calls.load(Ordering::SeqCst));
		assert!(outcome.amount_to >= target);
		assert!(outcome.amount_to * U256::from(10_000u64) / target <= U256::from(10_050u64));
	}

	#[tokio::test]
	async fn test_underswap_search_converges_inside_band() {
		let target = U256::from(5_000_000u64);
		let outcome = search(
			target,
			U256::from(3_000_000u64),
			|from| linear(from, 2_100_000),
			underswap_band(target, 50),
		)
		.await
		.unwrap();

		assert!(outcome.amount_to <= target);
		assert!(outcome.amount_to * U256::from(10_000u64) / target >= U256::from(9_950u64));
	}

	#[tokio::test]
	async fn test_first_quote_inside_band_stops_immediately() {
		let target = U256::from(1_000u64);
		let outcome = search(
			target,
			U256::from(1_001u64),
			|from| linear(from, 1_000_000),
			overswap_band(target, 50),
		)
		.await
		.unwrap();
		assert_eq!(outcome.iterations, 1);
		assert_eq!(outcome.amount_from, U256::from(1_001u64));
	}

	#[tokio::test]
	async fn test_zero_output_is_quote_not_found() {
		let result = search(
			U256::from(1_000u64),
			U256::from(10u64),
			|_| async { Ok(((), U256::ZERO)) },
			overswap_band(U256::from(1_000u64), 50),
		)
		.await;
		assert!(matches!(result, Err(StrategyError::QuoteNotFound { .. })));
	}

	#[tokio::test]
	async fn test_never_accepting_band_exhausts_budget() {
		let calls = AtomicU32::new(0);
		let result = search(
			U256::from(1_000u64),
			U256::from(1_000u64),
			|from| {
				calls.fetch_add(1, Ordering::SeqCst);
				linear(from, 1_000_000)
			},
			|_| true,
		)
		.await;
		assert!(matches!(
			result,
			Err(StrategyError::ConvergenceExceeded { iterations: 15 })
		));
		assert_eq!(calls.load(Ordering::SeqCst), MAX_SEARCH_ITERATIONS);
	}

	#[test]
	fn test_bands() {
		let target = U256::from(10_000u64);
		let over = overswap_band(target, 50);
		assert!(over(U256::from(9_999u64)));
		assert!(!over(U256::from(10_000u64)));
		assert!(!over(U256::from(10_050u64)));
		assert!(over(U256::from(10_051u64)));

		let under = underswap_band(target, 50);
		assert!(under(U256::from(10_001u64)));
		assert!(!under(U256::from(10_000u64)));
		assert!(!under(U256::from(9_950u64)));
		assert!(under(U256::from(9_949u64)));
	}
}
