//! Swap Strategies
//!
//! Routing strategies, the convergence search they share, and the
//! collaborator clients (quote sources, chain reader) they call.

pub mod chain;
pub mod deps;
pub mod errors;
pub mod helpers;
pub mod registry;
pub mod search;
pub mod sources;
pub mod test_utils;
pub mod traits;
pub mod variants;

pub use chain::{ChainReadError, ChainReader, RpcChainReader};
pub use deps::{StrategyDeps, Tuning};
pub use errors::{StrategyError, StrategyResult};
pub use registry::{StrategyConstructor, StrategyRegistry};
pub use search::{overswap_band, search, underswap_band, SearchOutcome};
pub use sources::{ClientCache, QuoteSource, SourceFilter, SourceRegistry};
pub use traits::Strategy;
