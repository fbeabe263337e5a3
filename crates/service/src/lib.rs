//! Swap Router Service
//!
//! Routing pipeline over the configured strategies, and the swap service
//! fronting it.

pub mod route_filter;
pub mod router;
pub mod routing_table;
pub mod swap_service;

pub use route_filter::{RouteFilter, RouteFilterTrait};
pub use router::{Router, RouterLimits};
pub use routing_table::{validate_routing, RoutingTable, RoutingTableError};
pub use swap_service::{SwapParams, SwapService, SwapServiceError, SwapServiceResult};
