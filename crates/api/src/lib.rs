//! Swap Router API
//!
//! Axum routes and middleware exposing the swap service over HTTP.

pub mod handlers;
pub mod query;
pub mod router;
pub mod security;
pub mod state;

pub use handlers::common::{ApiError, ApiResponse};
pub use query::SwapQuery;
pub use router::{create_router, create_router_with_body_limit};
pub use state::AppState;
