//! Demonstrates the signing round trip without any network: the caller signs a transfer,
//! the receiving side verifies the header set, and a replayed copy of the same request is
//! refused by the nonce cache.

// crates.io
use color_eyre::Result;
use time::OffsetDateTime;
// self
use hmac_request_signer::{
	auth::{ClientId, SecretKey},
	signing::{AuthHeaders, RequestSigner, SignedRequest, SignerConfig},
	verify::{Verifier, VerifierConfig, VerifyError},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let secret = SecretKey::new("demo-shared-secret")?;
	let client = ClientId::new("sacco-demo")?;
	let signer =
		RequestSigner::new(SignerConfig::new(secret.clone()).with_client_header(client.clone()))?;
	let verifier = Verifier::new(VerifierConfig::new(secret).require_client(client))?;
	let request = SignedRequest::new("POST", "/api/v1/wallets/transfer")?
		.with_body("{\"amount\":1000,\"currency\":\"USD\"}");
	let headers = signer.auth_headers(&request)?;

	for (name, value) in headers.pairs() {
		println!("{name}: {value}");
	}

	// The receiver only sees raw header strings.
	let pairs = headers.pairs();
	let received = AuthHeaders::from_lookup(|name| {
		pairs.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
	})?;
	let now = OffsetDateTime::now_utc();

	verifier.verify_headers(&request.method, &request.path, &request.body, &received, now)?;

	println!("first delivery accepted");

	match verifier.verify_headers(&request.method, &request.path, &request.body, &received, now) {
		Err(VerifyError::Replayed) => println!("replayed delivery refused"),
		other => println!("unexpected replay verdict: {other:?}"),
	}

	Ok(())
}
