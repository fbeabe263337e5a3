//! Swap Composer
//!
//! Encodes swapper multicall items, the verifier payload and the amount math
//! shared by every routing strategy.

pub mod abi;
pub mod errors;
pub mod items;
pub mod math;
pub mod payloads;
pub mod response;

pub use abi::Handler;
pub use errors::{ComposerError, ComposerResult, MathError};
pub use items::SwapItem;
pub use math::{adjust_for_interest, apply_slippage, estimate_amount_from, pow10};
pub use payloads::{build_multicall, build_verify_debt_max, build_verify_skim_min, ensure_verifier_calldata};
pub use response::{add_in_out_deposits, assemble, exact_input_result, Amounts};
