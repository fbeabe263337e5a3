//! Swap Router Library
//!
//! Quote routing pipeline for lending-protocol swaps: strategies, quote
//! sources, calldata composition and the HTTP surface exposing them.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use swap_config::{load_config, log_service_info, log_service_shutdown, log_startup_complete};
use swap_service::{Router, RouterLimits};
use swap_strategies::sources::{create_source, SourceConfig, UniswapRouter, UniswapSource};
use tracing::{info, warn};

// Core domain types
pub use swap_types::{
	serde_json, Address, MatchFilter, Quote, RouterError, RoutingConfig, RoutingEntry, SwapRequest,
	SwapResult, SwapperMode, TokenInfo, TokenList, VerificationKind, U256,
};

// Pipeline and service
pub use swap_service::{RoutingTable, SwapParams, SwapService, SwapServiceError};
pub use swap_strategies::{
	ChainReader, ClientCache, QuoteSource, SourceRegistry, Strategy, StrategyConstructor,
	StrategyDeps, StrategyRegistry, Tuning,
};

// API layer
pub use swap_api::{create_router, create_router_with_body_limit, AppState};

// Config
pub use swap_config::{LogFormat, LoggingSettings, Settings};

pub mod types {
	pub use ::swap_types::*;
}

pub mod composer {
	pub use ::swap_composer::*;
}

pub mod strategies {
	pub use ::swap_strategies::*;
}

pub mod service {
	pub use ::swap_service::*;
}

pub mod config {
	pub use ::swap_config::*;
}

pub mod api {
	pub use ::swap_api::*;
}

pub mod mocks;

pub use async_trait;
pub use reqwest;

/// Assembles the routing pipeline and its HTTP router.
///
/// Anything not injected is built from the settings: token lists from
/// `tokens_dir`, the routing table from `routing_path`, quote sources from
/// the enabled `sources` and the chain reader from the chain RPC endpoints.
#[derive(Default)]
pub struct RouterBuilder {
	settings: Option<Settings>,
	sources: Vec<Arc<dyn QuoteSource>>,
	tokens: Option<TokenList>,
	chain_reader: Option<Arc<dyn ChainReader>>,
	uniswap: Option<Arc<dyn UniswapRouter>>,
	routing_table: Option<RoutingTable>,
	strategies: Vec<(String, StrategyConstructor)>,
}

impl RouterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_config(settings: Settings) -> Self {
		Self::new().with_settings(settings)
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register a quote source. Injected sources replace the configured ones.
	pub fn with_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
		self.sources.push(source);
		self
	}

	pub fn with_tokens(mut self, tokens: TokenList) -> Self {
		self.tokens = Some(tokens);
		self
	}

	pub fn with_chain_reader(mut self, chain_reader: Arc<dyn ChainReader>) -> Self {
		self.chain_reader = Some(chain_reader);
		self
	}

	pub fn with_uniswap(mut self, uniswap: Arc<dyn UniswapRouter>) -> Self {
		self.uniswap = Some(uniswap);
		self
	}

	pub fn with_routing_table(mut self, table: RoutingTable) -> Self {
		self.routing_table = Some(table);
		self
	}

	/// Register an extra strategy, replacing a default one with the same id
	pub fn with_strategy(mut self, id: &str, constructor: StrategyConstructor) -> Self {
		self.strategies.push((id.to_string(), constructor));
		self
	}

	fn build_sources(
		&self,
		settings: &Settings,
		cache: &ClientCache,
	) -> Result<SourceRegistry, Box<dyn std::error::Error>> {
		if !self.sources.is_empty() {
			return Ok(self
				.sources
				.iter()
				.fold(SourceRegistry::new(), |registry, source| {
					registry.with_source(Arc::clone(source))
				}));
		}

		let mut registry = SourceRegistry::new();
		for (id, source) in settings.enabled_sources() {
			if id == swap_strategies::sources::uniswap::SOURCE_ID {
				continue;
			}
			let config = source_config(settings, &source)?;
			registry.register(create_source(&id, config, cache.clone())?);
		}
		Ok(registry)
	}

	fn build_uniswap(
		&self,
		settings: &Settings,
		cache: &ClientCache,
	) -> Result<Option<Arc<dyn UniswapRouter>>, Box<dyn std::error::Error>> {
		if let Some(uniswap) = &self.uniswap {
			return Ok(Some(Arc::clone(uniswap)));
		}
		match settings
			.enabled_sources()
			.get(swap_strategies::sources::uniswap::SOURCE_ID)
		{
			Some(source) => {
				let config = source_config(settings, source)?;
				Ok(Some(Arc::new(UniswapSource::new(config, cache.clone()))))
			},
			None => Ok(None),
		}
	}

	/// Build the swap service described by `settings` and the injected parts
	pub fn build_service(self, settings: &Settings) -> Result<SwapService, Box<dyn std::error::Error>> {
		let cache = ClientCache::new();
		let sources = self.build_sources(settings, &cache)?;
		let uniswap = self.build_uniswap(settings, &cache)?;

		let tokens = match self.tokens {
			Some(tokens) => tokens,
			None => TokenList::load_dir(Path::new(&settings.tokens_dir))?,
		};
		let chain_reader: Arc<dyn ChainReader> = match self.chain_reader {
			Some(reader) => reader,
			None => Arc::new(swap_strategies::RpcChainReader::new(
				settings.rpc_endpoints()?,
				settings.timeouts.rpc_ms,
			)?),
		};

		info!(
			"Quote sources: {:?}, uniswap router: {}",
			sources.ids(),
			uniswap.is_some()
		);

		let mut deps = StrategyDeps::new(
			Arc::new(tokens),
			settings.contract_book(),
			chain_reader,
			sources,
		)
		.with_tuning(Tuning {
			interest_buffer_bps: settings.tuning.interest_buffer_bps,
			overswap_tolerance_bps: settings.tuning.overswap_tolerance_bps,
			underswap_tolerance_bps: settings.tuning.underswap_tolerance_bps,
			source_timeout_ms: settings.timeouts.source_ms,
		});
		if let Some(uniswap) = uniswap {
			deps = deps.with_uniswap(uniswap);
		}

		let mut registry = StrategyRegistry::with_defaults(deps);
		for (id, constructor) in self.strategies {
			registry.register(&id, constructor);
		}

		let table = match self.routing_table {
			Some(table) => table,
			None => RoutingTable::load(&settings.routing_path)?,
		};
		table
			.validate(&registry)
			.map_err(|e| format!("Routing table validation failed: {}", e))?;
		info!("Routing configured for chains {:?}", table.chain_ids());

		let router = Router::new(Arc::new(table), registry).with_limits(RouterLimits {
			entry_timeout_ms: settings.timeouts.entry_ms,
			max_depth: settings.tuning.max_routing_depth,
		});

		Ok(SwapService::new(Arc::new(router)).with_request_timeout_ms(settings.timeouts.request_ms))
	}

	/// Build the application router and its state
	pub fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings
			.validate()
			.map_err(|e| format!("Invalid configuration: {}", e))?;

		let service = self.build_service(&settings)?;
		let app_state = AppState::new(Arc::new(service));
		let router =
			create_router_with_body_limit(settings.server.max_request_size).with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Load configuration, initialise logging and serve until ctrl-c
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		init_tracing(&settings.logging)?;
		log_service_info(&settings);
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, _) = self.start()?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /swap");
		info!("  GET  /swaps");

		axum::serve(listener, app)
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		log_service_shutdown();
		Ok(())
	}
}

fn source_config(
	settings: &Settings,
	source: &swap_config::SourceSettings,
) -> Result<SourceConfig, Box<dyn std::error::Error>> {
	let mut config = SourceConfig::new(source.base_url.clone())
		.with_api_key(source.resolve_api_key()?)
		.with_timeout_ms(settings.source_timeout_ms(source));
	if let Some(referrer) = &source.referrer {
		config = config.with_referrer(referrer.clone());
	}
	Ok(config)
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
	}
}

fn tracing_init_error(e: Box<dyn std::error::Error + Send + Sync>) -> String {
	format!("Failed to initialise tracing: {}", e)
}

/// Install the global tracing subscriber described by the logging settings
pub fn init_tracing(logging: &LoggingSettings) -> Result<(), Box<dyn std::error::Error>> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

	match logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(tracing_init_error)?;
			} else {
				subscriber.try_init().map_err(tracing_init_error)?;
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt().pretty().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(tracing_init_error)?;
			} else {
				subscriber.try_init().map_err(tracing_init_error)?;
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt().compact().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(tracing_init_error)?;
			} else {
				subscriber.try_init().map_err(tracing_init_error)?;
			}
		},
	}

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		logging.level, logging.format, logging.structured
	);
	Ok(())
}
