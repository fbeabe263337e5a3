//! Swap Router Types
//!
//! Shared domain models and traits for the swap routing pipeline.
//! This crate contains all domain models organized by business entity.

pub mod constants;
pub mod contracts;
pub mod models;
pub mod pipeline;
pub mod quotes;
pub mod routing;
pub mod swaps;
pub mod test_utils;
pub mod tokens;

// Re-export the primitive types used across the workspace
pub use alloy_primitives::{address, Address, Bytes, FixedBytes, B256, U256};
pub use chrono;
pub use serde_json;

pub use contracts::{ChainContracts, ContractBook};
pub use models::u256::{parse_amount, u256_decimal};
pub use pipeline::Pipeline;
pub use quotes::{Quote, SourceError, SourceResult};
pub use routing::{MatchFilter, RouterError, RoutingConfig, RoutingEntry, StrategyOutcome};
pub use swaps::{
	MulticallItem, RouteItem, SwapPayload, SwapRequest, SwapResult, SwapperMode,
	VerificationKind, VerifyPayload,
};
pub use tokens::{TokenInfo, TokenList, TokenListError, TokenLookup, TokenMeta};
