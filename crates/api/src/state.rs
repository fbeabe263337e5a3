use std::sync::Arc;

use swap_service::SwapService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub swap_service: Arc<SwapService>,
}

impl AppState {
	pub fn new(swap_service: Arc<SwapService>) -> Self {
		Self { swap_service }
	}
}
