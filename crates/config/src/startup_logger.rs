//! Service startup logging

use std::env;
use tracing::info;

use crate::settings::Settings;

/// Logs service, platform and configuration summary at startup
pub fn log_service_info(settings: &Settings) {
	let service_name = "swap-router";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Swap Router Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}
	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	let chains: Vec<u64> = settings.chains.iter().map(|c| c.chain_id).collect();
	info!("⛓️ Chains: {:?}", chains);
	for (id, source) in settings.enabled_sources() {
		match &source.api_key {
			Some(key) => info!("📡 Source {} at {} (key from {})", id, source.base_url, key.description()),
			None => info!("📡 Source {} at {}", id, source.base_url),
		}
	}
	info!(
		"⏱️ Timeouts: request {}ms, entry {}ms, source {}ms",
		settings.timeouts.request_ms, settings.timeouts.entry_ms, settings.timeouts.source_ms
	);
	info!("📋 Routing table: {}", settings.routing_path);

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Swap Router Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs additional startup completion information
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Swap Router Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
}
