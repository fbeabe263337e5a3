//! Parallel quotes across a filtered set of sources
//!
//! Exact-input requests fan out to every allowed source and return all
//! quotes, best first. Target-debt requests try provider exact-out quotes,
//! then overswap through the source that answered the unit probe best.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use swap_composer::{apply_slippage, exact_input_result, Amounts};
use swap_types::{Pipeline, Quote, SwapRequest, SwapResult, SwapperMode, U256};
use tracing::{debug, info, warn};

use super::{exact_in_into_swapper, guaranteed_output, overswap_search, quote_exact_in, target_debt_result};
use crate::deps::StrategyDeps;
use crate::errors::{StrategyError, StrategyResult};
use crate::helpers::{parse_config, sort_by_amount_out};
use crate::sources::{QuoteSource, SourceFilter};
use crate::traits::Strategy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceConfig {
	#[serde(default, alias = "sourcesFilter")]
	pub sources: SourceFilter,
	/// Try provider exact-out quotes before overswapping
	#[serde(default)]
	pub try_exact_out: bool,
	/// Never overswap when no exact-out quote is available
	#[serde(default)]
	pub only_exact_out: bool,
	/// Per-source timeout, defaults to the tuning value
	#[serde(default)]
	pub timeout_ms: Option<u64>,
}

pub struct MultiSourceStrategy {
	config: MultiSourceConfig,
	deps: StrategyDeps,
}

impl MultiSourceStrategy {
	pub const ID: &'static str = "multi_source";

	pub fn new(config: MultiSourceConfig, deps: StrategyDeps) -> Self {
		Self { config, deps }
	}

	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: MultiSourceConfig = parse_config(Self::ID, config)?;
		Ok(Self::new(config, deps.clone()))
	}

	fn sources(&self, chain_id: u64) -> Vec<Arc<dyn QuoteSource>> {
		self.deps.sources.select(&self.config.sources, chain_id)
	}

	fn timeout(&self) -> Duration {
		Duration::from_millis(
			self.config
				.timeout_ms
				.unwrap_or(self.deps.tuning.source_timeout_ms),
		)
	}

	/// Query `sources` concurrently; failed or slow sources are dropped
	async fn fan_out(
		&self,
		sources: &[Arc<dyn QuoteSource>],
		request: &SwapRequest,
		exact_out: bool,
	) -> Vec<(Arc<dyn QuoteSource>, Quote)> {
		let timeout = self.timeout();
		let calls = sources.iter().map(|source| async move {
			let call = async {
				if exact_out {
					source.quote_exact_out(request).await.map_err(StrategyError::from)
				} else {
					quote_exact_in(source.as_ref(), request).await
				}
			};
			match tokio::time::timeout(timeout, call).await {
				Ok(Ok(quote)) => Some((Arc::clone(source), quote)),
				Ok(Err(e)) => {
					warn!("Source {} failed to quote: {}", source.id(), e);
					None
				},
				Err(_) => {
					warn!("Source {} timed out after {}ms", source.id(), timeout.as_millis());
					None
				},
			}
		});
		join_all(calls).await.into_iter().flatten().collect()
	}

	async fn exact_in(&self, request: &SwapRequest) -> StrategyResult<Vec<SwapResult>> {
		let verifier = self.deps.verifier(request.chain_id)?;
		let quotes = self.fan_out(&self.sources(request.chain_id), request, false).await;
		info!("Collected {} exact-in quotes", quotes.len());

		let results = quotes
			.iter()
			.map(|(_, quote)| exact_input_result(request, quote, verifier))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(sort_by_amount_out(results))
	}

	/// Cheapest provider exact-out quote into the swapper
	async fn exact_out_quote(&self, request: &SwapRequest) -> StrategyResult<Option<(Quote, Amounts)>> {
		let sources: Vec<Arc<dyn QuoteSource>> = self
			.sources(request.chain_id)
			.into_iter()
			.filter(|source| source.supports_exact_out())
			.collect();
		if sources.is_empty() {
			return Ok(None);
		}

		let inner = request.clone().with_receiver(request.from);
		let best = self
			.fan_out(&sources, &inner, true)
			.await
			.into_iter()
			.min_by(|(_, a), (_, b)| a.amount_in.cmp(&b.amount_in));
		let Some((source, quote)) = best else {
			return Ok(None);
		};

		debug!("Exact-out quote from {}: in={}", source.id(), quote.amount_in);
		let amount_in_max = match quote.amount_in_max {
			Some(amount) => amount,
			None => apply_slippage(quote.amount_in, request.slippage_bps, true)?,
		};
		let amounts = Amounts::new(
			quote.amount_in,
			amount_in_max,
			quote.amount_out,
			quote.amount_out_min.unwrap_or(quote.amount_out),
		);
		Ok(Some((quote, amounts)))
	}

	/// Overswap search pinned to the best source of a one-unit probe
	async fn overswap_quote(&self, request: &SwapRequest) -> StrategyResult<Option<(Quote, Amounts)>> {
		let probe = exact_in_into_swapper(request).with_amount(request.token_in.unit());
		let mut best: Option<(Arc<dyn QuoteSource>, U256)> = None;
		for (source, quote) in self.fan_out(&self.sources(request.chain_id), &probe, false).await {
			let amount_to = guaranteed_output(&quote, request.slippage_bps)?;
			if best.as_ref().map_or(true, |(_, current)| amount_to > *current) {
				best = Some((source, amount_to));
			}
		}
		let Some((source, unit_to)) = best else {
			return Ok(None);
		};

		debug!("Overswapping through {} (unit output {})", source.id(), unit_to);
		let outcome = overswap_search(request, source.as_ref(), unit_to, &self.deps.tuning).await?;
		info!(
			"Overswap converged after {} iterations: in={} out={}",
			outcome.iterations, outcome.amount_from, outcome.amount_to
		);
		let amounts = Amounts::new(
			outcome.amount_from,
			outcome.amount_from,
			outcome.quote.amount_out,
			outcome.amount_to,
		);
		Ok(Some((outcome.quote, amounts)))
	}

	async fn target_debt(&self, request: &SwapRequest) -> StrategyResult<Vec<SwapResult>> {
		let verifier = self.deps.verifier(request.chain_id)?;

		let mut chosen = None;
		if self.config.try_exact_out && !request.only_fixed_input_exact_out {
			chosen = self.exact_out_quote(request).await?;
		}
		if chosen.is_none() && !self.config.only_exact_out {
			chosen = self.overswap_quote(request).await?;
		}

		Ok(chosen
			.map(|(quote, amounts)| target_debt_result(request, &quote, amounts, verifier))
			.into_iter()
			.collect())
	}
}

#[async_trait]
impl Strategy for MultiSourceStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		!request.is_exact_in_repay()
			&& matches!(request.mode, SwapperMode::ExactIn | SwapperMode::TargetDebt)
			&& !self.sources(request.chain_id).is_empty()
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		_pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		match request.mode {
			SwapperMode::ExactIn => self.exact_in(request).await,
			SwapperMode::TargetDebt => self.target_debt(request).await,
			SwapperMode::ExactOut => Ok(Vec::new()),
		}
	}
}
