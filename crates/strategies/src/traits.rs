//! Strategy trait

use async_trait::async_trait;
use swap_types::{Pipeline, SwapRequest, SwapResult};

use crate::errors::StrategyResult;

/// A routing strategy bound to the configuration of one routing entry
#[async_trait]
pub trait Strategy: Send + Sync {
	/// Registry id of the strategy
	fn id(&self) -> &str;

	/// Local, side-effect free eligibility check
	fn supports(&self, request: &SwapRequest) -> bool;

	/// Quote and assemble swaps for the request.
	///
	/// Returns an empty vec when there is no route; `Err` is reserved for
	/// unexpected failures.
	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>>;
}
