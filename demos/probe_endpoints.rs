//! Demonstrates discovering which endpoints and header layouts a payments API accepts.
//!
//! A local mock stands in for the provider: it only answers wallet reads that carry the client
//! header, and knows nothing about card issuing.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use hmac_request_signer::{
	auth::{ClientId, SecretKey},
	config::ClientConfig,
	http::ApiClient,
	probe::{self, EndpointProbe, ProbeTarget},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/wallets").header_exists("x-auth-client");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":true,\"data\":[]}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/virtualcards/create");
			then.status(403).body("{\"message\":\"Card issuing is not enabled\"}");
		})
		.await;

	let config = ClientConfig::builder(
		Url::parse(&server.url("/api/v1"))?,
		ClientId::new("sacco-demo")?,
		SecretKey::new("demo-shared-secret")?,
	)
	.include_client_header(true)
	.build()?;
	let delay = Duration::from_millis(200);
	let report = EndpointProbe::new(ApiClient::new(config.clone())?)
		.with_delay(delay)
		.run([
			ProbeTarget::get("/wallets"),
			ProbeTarget::get("/addresses"),
			ProbeTarget::post("/virtualcards/create", "{\"amount\":10}"),
		])
		.await;

	for entry in &report.entries {
		println!("{:<32} {}", entry.target.to_string(), entry.outcome.as_str());
	}

	let variants =
		probe::probe_auth_variants(&config, &ProbeTarget::get("/wallets"), delay).await?;

	println!("accepted header layouts: {:?}", variants.accepted_variants());

	Ok(())
}
