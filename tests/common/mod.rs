//! Fixtures shared by the integration tests. The HTTP client built here accepts invalid
//! certificates, so it only ever lives under `tests/`.

#![allow(dead_code, unused_imports)]

// std
pub use std::sync::Arc;
// crates.io
pub use serde::Deserialize;
pub use time::{Duration, OffsetDateTime};
// self
pub use hmac_request_signer::{error::Error, reqwest::Client as ReqwestClient, url::Url};
use hmac_request_signer::{
	auth::{ClientId, SecretKey},
	config::ClientConfig,
	http::ApiClient,
};

/// Shared secret used by integration tests.
pub const TEST_SECRET: &str = "testsecret";
/// Client identifier used by integration tests.
pub const TEST_CLIENT_ID: &str = "sacco-test-client";

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_client() -> ReqwestClient {
	ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.")
}

/// Builds a [`ClientConfig`] pointed at `base_url` with the shared test credentials.
pub fn test_client_config(base_url: &str, include_client_header: bool) -> ClientConfig {
	ClientConfig::builder(
		Url::parse(base_url).expect("Test base URL should parse."),
		ClientId::new(TEST_CLIENT_ID).expect("Test client identifier should be valid."),
		SecretKey::new(TEST_SECRET).expect("Test secret should be non-empty."),
	)
	.include_client_header(include_client_header)
	.build()
	.expect("Test client configuration should build.")
}

/// Constructs an [`ApiClient`] that talks to a mock server at `base_url`.
pub fn build_test_api_client(base_url: &str, include_client_header: bool) -> ApiClient {
	ApiClient::with_client(test_client_config(base_url, include_client_header), test_reqwest_client())
		.expect("Test API client should build.")
}
