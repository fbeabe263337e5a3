//! Exact-input quotes from one named source

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use swap_composer::exact_input_result;
use swap_types::{Pipeline, SwapRequest, SwapResult, SwapperMode};
use tracing::debug;

use super::quote_exact_in;
use crate::deps::StrategyDeps;
use crate::errors::{StrategyError, StrategyResult};
use crate::helpers::parse_config;
use crate::sources::QuoteSource;
use crate::traits::Strategy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleSourceConfig {
	source: Option<String>,
}

pub struct SingleSourceStrategy {
	source: Arc<dyn QuoteSource>,
	deps: StrategyDeps,
}

impl SingleSourceStrategy {
	pub const ID: &'static str = "single_source";

	pub fn new(source: Arc<dyn QuoteSource>, deps: StrategyDeps) -> Self {
		Self { source, deps }
	}

	pub fn from_config(deps: &StrategyDeps, config: Option<&Value>) -> StrategyResult<Self> {
		let config: SingleSourceConfig = parse_config(Self::ID, config)?;
		let source_id = config
			.source
			.ok_or_else(|| StrategyError::invalid_config(Self::ID, "missing `source`"))?;
		let source = deps.sources.get(&source_id).ok_or_else(|| {
			StrategyError::invalid_config(Self::ID, format!("quote source '{}' is not configured", source_id))
		})?;
		Ok(Self::new(source, deps.clone()))
	}
}

#[async_trait]
impl Strategy for SingleSourceStrategy {
	fn id(&self) -> &str {
		Self::ID
	}

	fn supports(&self, request: &SwapRequest) -> bool {
		request.mode == SwapperMode::ExactIn
			&& !request.is_repay
			&& self.source.supports_chain(request.chain_id)
	}

	async fn find_swap(
		&self,
		request: &SwapRequest,
		_pipeline: &dyn Pipeline,
	) -> StrategyResult<Vec<SwapResult>> {
		let verifier = self.deps.verifier(request.chain_id)?;
		let quote = quote_exact_in(self.source.as_ref(), request).await?;
		debug!(
			"Source {} quoted {} -> {}",
			self.source.id(),
			quote.amount_in,
			quote.amount_out
		);
		Ok(vec![exact_input_result(request, &quote, verifier)?])
	}
}
