mod common;

// std
use std::time::{Duration as StdDuration, Instant};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use hmac_request_signer::{
	http::ApiClient,
	probe::{self, AuthVariant, EndpointProbe, ProbeOutcome, ProbeTarget},
};

#[tokio::test]
async fn probe_reports_each_endpoint_in_order() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/wallets");
			then.status(200).body("{\"status\":true}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/virtualcards/create");
			then.status(403).body("{\"message\":\"Forbidden\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/addresses");
			then.status(429).body("slow down");
		})
		.await;

	let probe = EndpointProbe::new(build_test_api_client(&server.base_url(), false))
		.with_delay(StdDuration::ZERO);
	let report = probe
		.run([
			ProbeTarget::get("/wallets"),
			ProbeTarget::post("/virtualcards/create", "{\"amount\":5}"),
			ProbeTarget::get("/cards"),
			ProbeTarget::get("/addresses"),
			ProbeTarget::get("no-leading-slash"),
		])
		.await;
	let outcomes = report.entries.iter().map(|entry| entry.outcome.clone()).collect::<Vec<_>>();

	assert_eq!(outcomes[0], ProbeOutcome::Available { status: 200 });
	assert_eq!(outcomes[1], ProbeOutcome::AuthenticationRejected { status: 403 });
	assert_eq!(outcomes[2], ProbeOutcome::UnknownEndpoint { status: 404 });
	assert_eq!(outcomes[3], ProbeOutcome::UnexpectedStatus { status: 429 });
	assert!(matches!(outcomes[4], ProbeOutcome::InvalidTarget { .. }));
	assert_eq!(report.available().count(), 1);
	assert!(report.entries.iter().all(|entry| entry.variant == AuthVariant::WithoutClientHeader));
}

#[tokio::test]
async fn probe_pauses_between_calls() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/wallets");
			then.status(200).body("{}");
		})
		.await;
	let delay = StdDuration::from_millis(60);
	let probe =
		EndpointProbe::new(build_test_api_client(&server.base_url(), false)).with_delay(delay);
	let started = Instant::now();
	let report = probe.run((0..3).map(|_| ProbeTarget::get("/wallets"))).await;

	assert!(started.elapsed() >= delay * 2, "Two pauses separate three calls.");
	assert_eq!(report.entries.len(), 3);

	mock.assert_calls_async(3).await;
}

#[tokio::test]
async fn auth_variants_are_compared() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/wallets").header("x-auth-client", TEST_CLIENT_ID);
			then.status(200).body("{\"status\":true}");
		})
		.await;

	let config = test_client_config(&server.base_url(), false);
	let report = probe::probe_auth_variants_with_client(
		&config,
		test_reqwest_client(),
		&ProbeTarget::get("/wallets"),
		StdDuration::ZERO,
	)
	.await
	.expect("Both variants should be probed.");

	assert_eq!(report.entries.len(), 2);
	assert_eq!(report.entries[0].variant, AuthVariant::WithClientHeader);
	assert_eq!(report.entries[0].outcome, ProbeOutcome::Available { status: 200 });
	assert_eq!(report.entries[1].variant, AuthVariant::WithoutClientHeader);
	assert_eq!(report.entries[1].outcome, ProbeOutcome::UnknownEndpoint { status: 404 });
	assert_eq!(report.accepted_variants(), vec![AuthVariant::WithClientHeader]);
}

#[tokio::test]
async fn unreachable_remote_is_a_network_failure() {
	let listener =
		std::net::TcpListener::bind("127.0.0.1:0").expect("Local listener should bind.");
	let addr = listener.local_addr().expect("Listener should expose its address.");

	drop(listener);

	let report = EndpointProbe::new(build_test_api_client(&format!("http://{addr}"), false))
		.with_delay(StdDuration::ZERO)
		.run([ProbeTarget::get("/wallets")])
		.await;

	assert!(matches!(report.entries[0].outcome, ProbeOutcome::NetworkFailure { .. }));
	assert!(report.accepted_variants().is_empty());
}

#[tokio::test]
async fn slow_endpoint_is_reported_as_timed_out() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/wallets");
			then.status(200).delay(StdDuration::from_millis(800)).body("{}");
		})
		.await;

	let mut config = test_client_config(&server.base_url(), false);

	config.timeout = Duration::milliseconds(100);

	let client =
		ApiClient::with_client(config, test_reqwest_client()).expect("Client should build.");
	let report = EndpointProbe::new(client)
		.with_delay(StdDuration::ZERO)
		.run([ProbeTarget::get("/wallets")])
		.await;

	assert_eq!(report.entries[0].outcome, ProbeOutcome::TimedOut);
	assert!(report.entries[0].outcome.status().is_none());
	assert_eq!(report.available().count(), 0);
}
