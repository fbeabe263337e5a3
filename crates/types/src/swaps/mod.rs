//! Swap request and response models

pub mod request;
pub mod response;

pub use request::{SwapRequest, SwapperMode};
pub use response::{
	MulticallItem, RouteItem, SwapPayload, SwapResult, VerificationKind, VerifyPayload,
};
