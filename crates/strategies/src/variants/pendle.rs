//! Principal-token swaps through the Pendle market of the instrument

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use swap_composer::{exact_input_result, Amounts};
use swap_types::{Pipeline, SourceError, SwapRequest, SwapResult, SwapperMode};
use tracing::{debug, info};

use super::{exact_in_into_swapper, guaranteed_output, overswap_search, quote_exact_in, target_debt_result};
use crate::deps::StrategyDeps;
use crate::errors::{StrategyError, StrategyResult};
use crate::helpers::{parse_config, route_inner};
use crate::sources::pendle::SOURCE_ID as PENDLE_SOURCE_ID;
use crate::sources::QuoteSource;
use crate::traits::Strategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendleConfig {
	/// Quote source serving the market swaps
	#[serde(default = "default_source")]
	pub source: String,
}

fn default_source() -> String {
	PENDLE_SOURCE_ID.to_string()
}

impl Default for PendleConfig {
	fn default() -> Self {
		Self {
			source: default_source(),
		}
	}
}

pub struct PendleStrategy {
	source: Option<Arc<dyn QuoteSource>>,
	deps: StrategyDeps,
}

impl PendleStrategy {
	pub const ID: &'static str = "pendle";

	pub fn new(source: Option<Arc<dyn QuoteSource>>, deps: StrategyDeps) -> Self {
		Self { source, deps }
	}

	/// A missing source leaves the strategy registered but unsupported
	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: PendleConfig = parse_config(Self::ID, config)?;
		Ok(Self::new(deps.sources.get(&config.source), deps.clone()))
	}

	async fn exact_in(&self, source: &dyn QuoteSource, request: &SwapRequest) -> StrategyResult<SwapResult> {
		let verifier = self.deps.verifier(request.chain_id)?;
		let quote = quote_exact_in(source, request).await?;
		Ok(exact_input_result(request, &quote, verifier)?)
	}

	async fn target_debt(&self, source: &dyn QuoteSource, request: &SwapRequest) -> StrategyResult<SwapResult> {
		let verifier = self.deps.verifier(request.chain_id)?;
		let probe = exact_in_into_swapper(request).with_amount(request.token_in.unit());
		let unit = quote_exact_in(source, &probe).await?;
		let unit_to = guaranteed_output(&unit, request.slippage_bps)?;

		let outcome = overswap_search(request, source, unit_to, &self.deps.tuning).await?;
		info!(
			"Principal token overswap converged after {} iterations: in={} out={}",
			outcome.iterations, outcome.amount_from, outcome.amount_to
		);
		let amounts = Amounts::new(
			outcome.amount_from,
			outcome.amount_from,
			outcome.quote.amount_out,
			outcome.amount_to,
		);
		Ok(target_debt_result(request, &outcome.quote, amounts, verifier))
	}
}

#[async_trait]
impl Strategy for PendleStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		!request.is_exact_in_repay()
			&& matches!(request.mode, SwapperMode::ExactIn | SwapperMode::TargetDebt)
			&& request.involves_principal_token()
			&& self
				.source
				.as_ref()
				.is_some_and(|source| source.supports_chain(request.chain_id))
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let Some(source) = self.source.as_ref() else {
			return Ok(Vec::new());
		};

		let direct = match request.mode {
			SwapperMode::ExactIn => self.exact_in(source.as_ref(), request).await,
			SwapperMode::TargetDebt => self.target_debt(source.as_ref(), request).await,
			SwapperMode::ExactOut => return Ok(Vec::new()),
		};

		match direct {
			Ok(result) => Ok(vec![result]),
			Err(StrategyError::Source(e)) if market_has_no_route(&e) => {
				debug!("No direct market route ({}), falling back to the pipeline", e);
				route_inner(pipeline, request.clone(), &[Self::ID]).await
			},
			Err(e) => Err(e),
		}
	}
}

/// The market answered but cannot route the pair. Transport faults and
/// timeouts fail the entry instead.
fn market_has_no_route(error: &SourceError) -> bool {
	matches!(
		error,
		SourceError::HttpStatus { .. }
			| SourceError::InvalidResponse { .. }
			| SourceError::UnsupportedOperation { .. }
			| SourceError::ChainNotSupported { .. }
	)
}
