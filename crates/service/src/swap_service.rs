//! Swap service
//!
//! Turns validated request parameters into a `SwapRequest`, runs it through
//! the routing pipeline under the request deadline and finalizes the
//! returned swaps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use swap_composer::{add_in_out_deposits, ensure_verifier_calldata};
use swap_strategies::StrategyRegistry;
use swap_types::constants::limits::{DEFAULT_REQUEST_TIMEOUT_MS, MAX_SLIPPAGE_BPS};
use swap_types::routing::describe;
use swap_types::{
	Address, Pipeline, RouterError, RoutingConfig, SwapRequest, SwapResult, SwapperMode, U256,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::router::Router;
use crate::routing_table::validate_routing;

#[derive(Debug, Error)]
pub enum SwapServiceError {
	#[error("Token {side} not supported")]
	TokenNotSupported {
		side: &'static str,
		chain_id: u64,
		address: Address,
	},

	#[error(transparent)]
	Router(#[from] RouterError),
}

impl SwapServiceError {
	pub fn status_code(&self) -> u16 {
		match self {
			Self::TokenNotSupported { .. } => 404,
			Self::Router(e) => e.status_code(),
		}
	}
}

pub type SwapServiceResult<T> = Result<T, SwapServiceError>;

/// Validated swap parameters, before token and contract resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SwapParams {
	pub chain_id: u64,
	pub token_in: Address,
	pub token_out: Address,
	pub receiver: Address,
	pub vault_in: Address,
	pub origin: Address,
	pub account_in: Address,
	pub account_out: Address,
	pub mode: SwapperMode,
	pub amount: U256,
	pub target_debt: U256,
	pub current_debt: U256,
	pub slippage_bps: u32,
	pub deadline: u64,
	pub is_repay: bool,
	pub routing_override: Option<RoutingConfig>,
}

#[derive(Clone)]
pub struct SwapService {
	router: Arc<Router>,
	request_timeout_ms: u64,
}

impl SwapService {
	pub fn new(router: Arc<Router>) -> Self {
		Self {
			router,
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
		}
	}

	pub fn with_request_timeout_ms(mut self, request_timeout_ms: u64) -> Self {
		self.request_timeout_ms = request_timeout_ms;
		self
	}

	pub fn registry(&self) -> &StrategyRegistry {
		self.router.registry()
	}

	/// Chains with a static routing config
	pub fn chain_ids(&self) -> Vec<u64> {
		self.router.table().chain_ids()
	}

	/// Resolve tokens and the chain's swapper, and validate any routing override
	pub fn build_request(&self, params: SwapParams) -> SwapServiceResult<SwapRequest> {
		if params.chain_id == 0 {
			return Err(RouterError::invalid("chainId must be positive").into());
		}
		if params.slippage_bps > MAX_SLIPPAGE_BPS {
			return Err(RouterError::invalid("slippage over the 50% limit").into());
		}

		let deps = self.registry().deps();
		let token_in = deps
			.tokens
			.find_token(params.chain_id, params.token_in)
			.ok_or(SwapServiceError::TokenNotSupported {
				side: "in",
				chain_id: params.chain_id,
				address: params.token_in,
			})?;
		let token_out = deps
			.tokens
			.find_token(params.chain_id, params.token_out)
			.ok_or(SwapServiceError::TokenNotSupported {
				side: "out",
				chain_id: params.chain_id,
				address: params.token_out,
			})?;
		let from = deps
			.contracts
			.swapper(params.chain_id)
			.ok_or(RouterError::ConfigMissing {
				chain_id: params.chain_id,
			})?;

		if let Some(routing) = &params.routing_override {
			validate_routing(params.chain_id, routing, self.registry()).map_err(RouterError::from)?;
		}

		Ok(SwapRequest {
			chain_id: params.chain_id,
			token_in,
			token_out,
			account_in: params.account_in,
			account_out: params.account_out,
			vault_in: params.vault_in,
			receiver: params.receiver,
			origin: params.origin,
			from,
			mode: params.mode,
			amount: params.amount,
			target_debt: params.target_debt,
			current_debt: params.current_debt,
			slippage_bps: params.slippage_bps,
			deadline: params.deadline,
			is_repay: params.is_repay,
			routing_override: params.routing_override,
			only_fixed_input_exact_out: false,
			depth: 0,
			expires_at: None,
		})
	}

	/// All swaps found for the request, best first
	pub async fn find_swaps(&self, params: SwapParams) -> SwapServiceResult<Vec<SwapResult>> {
		let request = self.build_request(params)?;
		self.route(request).await
	}

	/// Best swap found for the request
	pub async fn find_best_swap(&self, params: SwapParams) -> SwapServiceResult<SwapResult> {
		self.find_swaps(params)
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| RouterError::QuoteNotFound { trace: Vec::new() }.into())
	}

	/// Route a resolved request and finalize its results
	pub async fn route(&self, request: SwapRequest) -> SwapServiceResult<Vec<SwapResult>> {
		let started = Instant::now();
		let request = request.with_expiry(started + Duration::from_millis(self.request_timeout_ms));
		info!("Routing swap request: {}", describe(&request));

		let results = match self.router.route(&request).await {
			Ok(results) => results,
			Err(e) => {
				if let Some(trace) = e.trace() {
					debug!("Routing trace: {:?}", trace);
				}
				warn!("Swap routing failed after {}ms: {}", started.elapsed().as_millis(), e);
				return Err(e.into());
			},
		};

		let finalized = results
			.into_iter()
			.map(|result| finalize(&request, result))
			.collect::<SwapServiceResult<Vec<_>>>()?;

		info!(
			"Found {} swaps in {}ms",
			finalized.len(),
			started.elapsed().as_millis()
		);
		Ok(finalized)
	}
}

/// Append leftover deposits and refuse results without verifier calldata
fn finalize(request: &SwapRequest, result: SwapResult) -> SwapServiceResult<SwapResult> {
	let result = add_in_out_deposits(request, result);
	ensure_verifier_calldata(&result.verify)
		.map_err(|e| RouterError::Internal(e.to_string()))?;
	Ok(result)
}
