//! HTTP client cache for quote sources
//!
//! Provides per-source client instances with connection pooling, keep-alive
//! and a TTL after which clients are rebuilt.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swap_types::{SourceError, SourceResult};
use tracing::{debug, warn};

use super::SourceConfig;

/// Configuration for creating pooled HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	/// Base endpoint of the source
	pub base_url: String,
	/// Source identifier for cache differentiation
	pub source_id: String,
	/// Maximum number of idle connections per host
	pub max_idle_per_host: usize,
	/// Connection keep-alive timeout
	pub keep_alive_timeout_ms: u64,
	/// Whole-request timeout
	pub timeout_ms: u64,
	/// Default headers (auth, client ids)
	pub headers: Vec<(String, String)>,
}

impl ClientConfig {
	pub fn for_source(source_id: &str, config: &SourceConfig) -> Self {
		Self {
			base_url: config.base_url.clone(),
			source_id: source_id.to_string(),
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			timeout_ms: config.timeout_ms,
			headers: vec![
				("User-Agent".to_string(), "swap-router/1.0".to_string()),
				("Accept".to_string(), "application/json".to_string()),
			],
		}
	}
}

/// Authentication attached to a source client
#[derive(Debug, Clone)]
pub enum AuthConfig {
	/// No authentication
	None,
	/// `Authorization: Bearer <token>`
	Bearer { token: String },
	/// API key sent in a custom header
	ApiKey { header: String, key: String },
}

impl AuthConfig {
	/// Bearer auth when a key is configured
	pub fn bearer(token: Option<&str>) -> Self {
		match token {
			Some(t) => Self::Bearer {
				token: t.to_string(),
			},
			None => Self::None,
		}
	}

	/// Header auth when a key is configured
	pub fn header(header: &str, key: Option<&str>) -> Self {
		match key {
			Some(k) => Self::ApiKey {
				header: header.to_string(),
				key: k.to_string(),
			},
			None => Self::None,
		}
	}
}

/// Cached client with creation timestamp for TTL management
#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients keyed by source configuration
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	/// Create a new client cache with custom TTL
	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Get or create a pooled client for the given configuration
	pub fn get_client(&self, config: &ClientConfig) -> SourceResult<Arc<Client>> {
		self.clients.remove_if(config, |_, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				warn!(
					"Client cache expired for {} (age: {:?}), will create new client",
					config.base_url,
					cached_client.created_at.elapsed()
				);
			}
			is_expired
		});

		if let Some(cached_client) = self.clients.get(config) {
			debug!(
				"Reusing cached client for {} (age: {:?})",
				config.base_url,
				cached_client.created_at.elapsed()
			);
			return Ok(cached_client.client.clone());
		}

		debug!("Creating new client for {}", config.base_url);
		let cached_client = CachedClient::new(Self::create_client(config)?);
		let client = cached_client.client.clone();

		match self.clients.entry(config.clone()) {
			Entry::Occupied(entry) => {
				debug!(
					"Another task created client for {}, using existing",
					config.base_url
				);
				Ok(entry.get().client.clone())
			},
			Entry::Vacant(entry) => {
				entry.insert(cached_client);
				Ok(client)
			},
		}
	}

	/// Get or create a client carrying the given authentication
	pub fn get_client_with_auth(
		&self,
		source_id: &str,
		source_config: &SourceConfig,
		auth: &AuthConfig,
	) -> SourceResult<Arc<Client>> {
		let mut config = ClientConfig::for_source(source_id, source_config);
		match auth {
			AuthConfig::None => {},
			AuthConfig::Bearer { token } => {
				config
					.headers
					.push(("Authorization".to_string(), format!("Bearer {}", token)));
			},
			AuthConfig::ApiKey { header, key } => {
				config.headers.push((header.clone(), key.clone()));
			},
		}
		self.get_client(&config)
	}

	fn create_client(config: &ClientConfig) -> SourceResult<Client> {
		let mut header_map = reqwest::header::HeaderMap::new();
		for (key, value) in &config.headers {
			if let (Ok(header_name), Ok(header_value)) = (
				reqwest::header::HeaderName::from_bytes(key.as_bytes()),
				reqwest::header::HeaderValue::from_str(value),
			) {
				header_map.insert(header_name, header_value);
			}
		}

		ClientBuilder::new()
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.timeout(Duration::from_millis(config.timeout_ms))
			.default_headers(header_map)
			.build()
			.map_err(SourceError::Http)
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn source_config() -> SourceConfig {
		SourceConfig::new("https://api.example.com")
	}

	#[test]
	fn test_client_config_for_source() {
		let config = ClientConfig::for_source("1inch", &source_config());
		assert_eq!(config.base_url, "https://api.example.com");
		assert_eq!(config.source_id, "1inch");
		assert_eq!(config.max_idle_per_host, 10);
		assert_eq!(config.keep_alive_timeout_ms, 90_000);
	}

	#[tokio::test]
	async fn test_client_cache_reuse() {
		let cache = ClientCache::new();
		let config = ClientConfig::for_source("kyberswap", &source_config());

		let client1 = cache.get_client(&config).unwrap();
		let client2 = cache.get_client(&config).unwrap();
		assert!(Arc::ptr_eq(&client1, &client2));
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn test_client_cache_ttl_expiration() {
		let cache = ClientCache::with_ttl(Duration::from_millis(50));
		let config = ClientConfig::for_source("lifi", &source_config());

		let client1 = cache.get_client(&config).unwrap();
		tokio::time::sleep(Duration::from_millis(100)).await;

		// expired entry is replaced on the next lookup
		let client2 = cache.get_client(&config).unwrap();
		assert!(!Arc::ptr_eq(&client1, &client2));
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn test_concurrent_access_yields_single_client() {
		let cache = ClientCache::new();
		let config = ClientConfig::for_source("pendle", &source_config());

		let handles: Vec<_> = (0..10)
			.map(|_| {
				let cache = cache.clone();
				let config = config.clone();
				tokio::spawn(async move { cache.get_client(&config).unwrap() })
			})
			.collect();

		let clients: Vec<Arc<Client>> = futures::future::join_all(handles)
			.await
			.into_iter()
			.map(|r| r.unwrap())
			.collect();
		for client in &clients[1..] {
			assert!(Arc::ptr_eq(&clients[0], client));
		}
	}

	#[tokio::test]
	async fn test_auth_differentiates_clients() {
		let cache = ClientCache::new();
		let config = source_config();

		let anonymous = cache
			.get_client_with_auth("1inch", &config, &AuthConfig::None)
			.unwrap();
		let keyed = cache
			.get_client_with_auth("1inch", &config, &AuthConfig::bearer(Some("key")))
			.unwrap();
		let keyed_again = cache
			.get_client_with_auth("1inch", &config, &AuthConfig::bearer(Some("key")))
			.unwrap();

		assert!(!Arc::ptr_eq(&anonymous, &keyed));
		assert!(Arc::ptr_eq(&keyed, &keyed_again));
	}
}
