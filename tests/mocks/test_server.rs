//! Test server for end-to-end tests

use axum::Router;
use swap_router::mocks::{mock_builder, mock_source};
use swap_router::strategies::test_utils::StaticQuoteSource;
use swap_router::RouterBuilder;
use tokio::task::JoinHandle;

/// Running server bound to an ephemeral port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Server over the mock pipeline with a single `1inch` source returning 200
	#[allow(dead_code)]
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with_sources(vec![mock_source()]).await
	}

	#[allow(dead_code)]
	pub async fn spawn_with_sources(
		sources: Vec<StaticQuoteSource>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with_builder(mock_builder(sources)).await
	}

	pub async fn spawn_with_builder(builder: RouterBuilder) -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _state) = builder.start()?;
		Self::spawn_server_with_app(app).await
	}

	async fn spawn_server_with_app(app: Router) -> Result<Self, Box<dyn std::error::Error>> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		// Give server time to start
		tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

		Ok(Self { base_url, handle })
	}

	#[allow(dead_code)]
	pub fn abort(self) {
		self.handle.abort();
	}
}
