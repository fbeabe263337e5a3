//! Test doubles for strategies and the pipeline
//!
//! Deterministic quote sources, chain reader and pipeline used by unit and
//! integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swap_composer::exact_input_result;
use swap_composer::Handler;
use swap_types::test_utils::{usdc, weth, TEST_CHAIN_ID, TEST_SWAPPER, TEST_VERIFIER};
use swap_types::{
	Address, Bytes, ChainContracts, ContractBook, Pipeline, Quote, RouterError, RoutingConfig, SourceError,
	SourceResult, SwapRequest, SwapResult, TokenInfo, TokenList, U256,
};

use crate::chain::{ChainReadResult, ChainReader};
use crate::deps::StrategyDeps;
use crate::sources::{QuoteSource, SourceRegistry, UniswapQuote, UniswapRouter};

/// Quote source returning `amount * numerator / denominator`
#[derive(Debug, Clone)]
pub struct StaticQuoteSource {
	id: String,
	label: String,
	chains: Vec<u64>,
	numerator: U256,
	denominator: U256,
	fixed_out: Option<U256>,
	exact_out: bool,
	delivers_to_receiver: bool,
	allowance_target: Option<Address>,
	should_fail: bool,
	times_out: bool,
	delay_ms: u64,
	calls: Arc<AtomicUsize>,
	seen_amounts: Arc<Mutex<Vec<U256>>>,
}

impl StaticQuoteSource {
	/// Source answering every exact-input quote with `amount_out`
	pub fn new(id: &str, amount_out: u64) -> Self {
		Self {
			id: id.to_string(),
			label: id.to_string(),
			chains: vec![1],
			numerator: U256::from(1u64),
			denominator: U256::from(1u64),
			fixed_out: Some(U256::from(amount_out)),
			exact_out: false,
			delivers_to_receiver: true,
			allowance_target: None,
			should_fail: false,
			times_out: false,
			delay_ms: 0,
			calls: Arc::new(AtomicUsize::new(0)),
			seen_amounts: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// Source pricing linearly at `numerator / denominator` output per input
	pub fn linear(id: &str, numerator: u128, denominator: u128) -> Self {
		Self {
			numerator: U256::from(numerator),
			denominator: U256::from(denominator),
			fixed_out: None,
			..Self::new(id, 0)
		}
	}

	pub fn on_chain(mut self, chain_id: u64) -> Self {
		self.chains = vec![chain_id];
		self
	}

	pub fn labelled(mut self, label: &str) -> Self {
		self.label = label.to_string();
		self
	}

	pub fn with_exact_out(mut self) -> Self {
		self.exact_out = true;
		self
	}

	pub fn without_receiver_delivery(mut self) -> Self {
		self.delivers_to_receiver = false;
		self
	}

	pub fn with_allowance_target(mut self, spender: Address) -> Self {
		self.allowance_target = Some(spender);
		self
	}

	pub fn failing(mut self) -> Self {
		self.should_fail = true;
		self
	}

	/// Fails every quote with a transport timeout instead of an HTTP status
	pub fn timing_out(mut self) -> Self {
		self.times_out = true;
		self
	}

	pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
		self.delay_ms = delay_ms;
		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Request amounts seen, in call order
	pub fn seen_amounts(&self) -> Vec<U256> {
		self.seen_amounts
			.lock()
			.map(|amounts| amounts.clone())
			.unwrap_or_default()
	}

	fn output_for(&self, amount: U256) -> U256 {
		self.fixed_out
			.unwrap_or_else(|| amount * self.numerator / self.denominator)
	}

	async fn before_call(&self, amount: U256) -> SourceResult<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if let Ok(mut amounts) = self.seen_amounts.lock() {
			amounts.push(amount);
		}
		if self.delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
		}
		if self.times_out {
			return Err(SourceError::Timeout {
				timeout_ms: self.delay_ms,
			});
		}
		if self.should_fail {
			return Err(SourceError::from_http_failure(503));
		}
		Ok(())
	}

	fn quote(&self, amount_in: U256, amount_out: U256) -> Quote {
		Quote::new(amount_in, amount_out, Bytes::from(vec![0xab; 4]), self.label.clone())
			.with_allowance_target(self.allowance_target)
	}
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
	fn id(&self) -> &str {
		&self.id
	}

	fn supports_chain(&self, chain_id: u64) -> bool {
		self.chains.contains(&chain_id)
	}

	fn supports_exact_out(&self) -> bool {
		self.exact_out
	}

	fn can_deliver_to_receiver(&self) -> bool {
		self.delivers_to_receiver
	}

	async fn quote_exact_in(&self, request: &SwapRequest) -> SourceResult<Quote> {
		self.before_call(request.amount).await?;
		Ok(self.quote(request.amount, self.output_for(request.amount)))
	}

	async fn quote_exact_out(&self, request: &SwapRequest) -> SourceResult<Quote> {
		if !self.exact_out {
			return Err(SourceError::UnsupportedOperation {
				operation: "quote_exact_out".to_string(),
				source_id: self.id.clone(),
			});
		}
		self.before_call(request.amount).await?;
		let amount_in = (request.amount * self.denominator).div_ceil(self.numerator);
		Ok(self
			.quote(amount_in, request.amount)
			.with_amount_in_max(amount_in)
			.with_amount_out_min(request.amount))
	}
}

/// Vault previews at a fixed `assets / shares` rate
#[derive(Debug, Clone)]
pub struct StaticChainReader {
	assets_per_share_num: U256,
	assets_per_share_den: U256,
}

impl StaticChainReader {
	pub fn new(assets_num: u64, shares_den: u64) -> Self {
		Self {
			assets_per_share_num: U256::from(assets_num),
			assets_per_share_den: U256::from(shares_den),
		}
	}

	fn to_assets(&self, shares: U256) -> U256 {
		shares * self.assets_per_share_num / self.assets_per_share_den
	}

	fn to_shares(&self, assets: U256) -> U256 {
		assets * self.assets_per_share_den / self.assets_per_share_num
	}
}

#[async_trait]
impl ChainReader for StaticChainReader {
	async fn preview_redeem(&self, _chain_id: u64, _vault: Address, shares: U256) -> ChainReadResult<U256> {
		Ok(self.to_assets(shares))
	}

	async fn preview_withdraw(&self, _chain_id: u64, _vault: Address, assets: U256) -> ChainReadResult<U256> {
		Ok(self.to_shares(assets))
	}

	async fn preview_deposit(&self, _chain_id: u64, _vault: Address, assets: U256) -> ChainReadResult<U256> {
		Ok(self.to_shares(assets))
	}

	async fn preview_mint(&self, _chain_id: u64, _vault: Address, shares: U256) -> ChainReadResult<U256> {
		Ok(self.to_assets(shares))
	}
}

/// Uniswap router quoting exact outputs at a fixed input per output
#[derive(Debug, Clone)]
pub struct StaticUniswapRouter {
	input_per_output_num: U256,
	input_per_output_den: U256,
	calls: Arc<AtomicUsize>,
}

impl StaticUniswapRouter {
	pub fn new(num: u64, den: u64) -> Self {
		Self {
			input_per_output_num: U256::from(num),
			input_per_output_den: U256::from(den),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl UniswapRouter for StaticUniswapRouter {
	fn supports_chain(&self, _chain_id: u64) -> bool {
		true
	}

	async fn route_exact_out(&self, request: &SwapRequest) -> SourceResult<UniswapQuote> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Ok(UniswapQuote {
			handler: Handler::UniswapV3,
			path: Bytes::from(vec![0x01; 43]),
			amount_in: request.amount * self.input_per_output_num / self.input_per_output_den,
			amount_out: request.amount,
		})
	}
}

type Responder = dyn Fn(&SwapRequest) -> Result<Vec<SwapResult>, RouterError> + Send + Sync;

/// Pipeline answering inner calls from a closure and recording them
pub struct ScriptedPipeline {
	routing: RoutingConfig,
	responder: Box<Responder>,
	seen: Mutex<Vec<SwapRequest>>,
}

impl ScriptedPipeline {
	pub fn new(
		routing: RoutingConfig,
		responder: impl Fn(&SwapRequest) -> Result<Vec<SwapResult>, RouterError> + Send + Sync + 'static,
	) -> Self {
		Self {
			routing,
			responder: Box::new(responder),
			seen: Mutex::new(Vec::new()),
		}
	}

	/// Pipeline whose inner calls find nothing
	pub fn empty() -> Self {
		Self::new(Vec::new(), |_| Err(RouterError::QuoteNotFound { trace: Vec::new() }))
	}

	/// Requests received, in call order
	pub fn seen(&self) -> Vec<SwapRequest> {
		self.seen
			.lock()
			.map(|seen| seen.clone())
			.unwrap_or_default()
	}
}

#[async_trait]
impl Pipeline for ScriptedPipeline {
	async fn route(&self, request: &SwapRequest) -> Result<Vec<SwapResult>, RouterError> {
		if let Ok(mut seen) = self.seen.lock() {
			seen.push(request.clone());
		}
		(self.responder)(request)
	}

	fn resolve_routing(&self, request: &SwapRequest) -> Result<RoutingConfig, RouterError> {
		Ok(request
			.routing_override
			.clone()
			.unwrap_or_else(|| self.routing.clone()))
	}
}

/// Exact-input result of `request` yielding `amount_out`, as a source strategy would build it
pub fn exact_in_result(request: &SwapRequest, amount_out: u64, label: &str) -> SwapResult {
	let quote = Quote::new(
		request.amount,
		U256::from(amount_out),
		Bytes::from(vec![0xcd; 4]),
		label,
	);
	exact_input_result(request, &quote, TEST_VERIFIER)
		.unwrap_or_else(|e| panic!("fixture result failed to compose: {}", e))
}

/// Contract book with the test swapper and verifier on the test chain
pub fn test_contracts() -> ContractBook {
	ContractBook::new().with_chain(
		TEST_CHAIN_ID,
		ChainContracts {
			swapper: TEST_SWAPPER,
			verifier: TEST_VERIFIER,
		},
	)
}

/// Deps over the given tokens and sources, with 1:1 vault previews
pub fn deps_with(tokens: Vec<TokenInfo>, sources: Vec<Arc<dyn QuoteSource>>) -> StrategyDeps {
	let registry = sources
		.into_iter()
		.fold(SourceRegistry::new(), |registry, source| registry.with_source(source));
	StrategyDeps::new(
		Arc::new(TokenList::from_tokens(tokens)),
		test_contracts(),
		Arc::new(StaticChainReader::new(1, 1)),
		registry,
	)
}

/// Deps listing USDC and WETH with a single `1inch` source returning 200
pub fn test_deps() -> StrategyDeps {
	deps_with(
		vec![usdc(), weth()],
		vec![Arc::new(StaticQuoteSource::new("1inch", 200))],
	)
}
