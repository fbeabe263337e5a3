//! Routing pipeline seam shared by the router and wrapper strategies

use async_trait::async_trait;

use crate::routing::{RouterError, RoutingConfig};
use crate::swaps::{SwapRequest, SwapResult};

/// The routing pipeline as seen by strategies that delegate back into it
#[async_trait]
pub trait Pipeline: Send + Sync {
	/// Run the request through its resolved routing config
	async fn route(&self, request: &SwapRequest) -> Result<Vec<SwapResult>, RouterError>;

	/// Routing config the request resolves to: its override, else the chain's static config
	fn resolve_routing(&self, request: &SwapRequest) -> Result<RoutingConfig, RouterError>;
}
