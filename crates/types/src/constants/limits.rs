//! Global limits and defaults for configuration and runtime

/// Basis points denominator (100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum slippage accepted from callers, in percent
pub const MAX_SLIPPAGE_PERCENT: f64 = 50.0;

/// Maximum slippage accepted from callers, in basis points
pub const MAX_SLIPPAGE_BPS: u32 = 5_000;

/// Iteration budget of the convergence search
pub const MAX_SEARCH_ITERATIONS: u32 = 15;

/// Default limit for nested pipeline invocations
pub const DEFAULT_MAX_ROUTING_DEPTH: u32 = 8;

/// Default buffer for interest accrued between quoting and execution (0.01%)
pub const DEFAULT_INTEREST_BUFFER_BPS: u32 = 1;

/// Default upper band of the overswap search (100% - 100.5% of target)
pub const DEFAULT_OVERSWAP_TOLERANCE_BPS: u32 = 50;

/// Default lower band of the underswap search (99.5% - 100% of target)
pub const DEFAULT_UNDERSWAP_TOLERANCE_BPS: u32 = 50;

/// Default overall budget for a single swap request in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000; // 30s

/// Default budget for a single routing entry in milliseconds
pub const DEFAULT_ENTRY_TIMEOUT_MS: u64 = 20_000; // 20s

/// Default timeout for a single quote source call in milliseconds
pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 10_000; // 10s

/// Minimum allowed timeout for quote source calls in milliseconds
pub const MIN_SOURCE_TIMEOUT_MS: u64 = 100;

/// Amount deposited into dust vaults so intermediate deposits never mint zero shares
pub const DUST_DEPOSIT_AMOUNT: u64 = 5;
