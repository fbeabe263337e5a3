//! Shared fixtures for the integration tests

pub mod fixtures;
pub mod test_server;

#[allow(unused_imports)]
pub use test_server::TestServer;
