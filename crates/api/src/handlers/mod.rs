pub mod common;
pub mod health;
pub mod swap;

pub use health::health;
pub use swap::{get_swap, get_swaps};
