//! Server-side counterpart of the request signer.

// crates.io
use hmac::Mac;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, SecretKey},
	error::ConfigError,
	obs::{self, OpKind, OpSpan},
	signing::{self, AuthHeaders, MessageFraming, Signature, SignedRequest, Timestamp},
	verify::{MemoryReplayCache, ReplayGuard, ReplayOutcome, VerifyError},
};

/// Configuration injected into a [`Verifier`].
#[derive(Clone, Debug)]
pub struct VerifierConfig {
	/// Shared symmetric key.
	pub secret: SecretKey,
	/// Maximum accepted distance between the request timestamp and now.
	pub tolerance: Duration,
	/// Signing message layout; must match the signer's.
	pub framing: MessageFraming,
	/// When set, the client header must be present and equal to this identifier.
	pub expected_client: Option<ClientId>,
}
impl VerifierConfig {
	/// Default replay window.
	pub const DEFAULT_TOLERANCE: Duration = Duration::seconds(300);

	/// Creates a configuration with the default tolerance and framing.
	pub fn new(secret: SecretKey) -> Self {
		Self {
			secret,
			tolerance: Self::DEFAULT_TOLERANCE,
			framing: MessageFraming::default(),
			expected_client: None,
		}
	}

	/// Overrides the replay window.
	pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
		self.tolerance = tolerance;

		self
	}

	/// Overrides the signing message layout.
	pub fn with_framing(mut self, framing: MessageFraming) -> Self {
		self.framing = framing;

		self
	}

	/// Requires the client header to name `client`.
	pub fn require_client(mut self, client: ClientId) -> Self {
		self.expected_client = Some(client);

		self
	}
}

/// Verifies signed requests against a shared key, a replay window, and a replay cache.
///
/// Checks run in a fixed order: client header (header entry point only), clock skew,
/// signature, then nonce. The nonce is recorded only once the signature checks out, so
/// unauthenticated traffic never fills the cache.
#[derive(Clone)]
pub struct Verifier {
	config: VerifierConfig,
	tolerance_ms: u64,
	replay: Arc<dyn ReplayGuard>,
}
impl Verifier {
	/// Creates a verifier backed by a fresh [`MemoryReplayCache`].
	pub fn new(config: VerifierConfig) -> Result<Self, ConfigError> {
		Self::with_replay_guard(config, Arc::new(MemoryReplayCache::default()))
	}

	/// Creates a verifier backed by the provided replay cache.
	pub fn with_replay_guard(
		config: VerifierConfig,
		replay: Arc<dyn ReplayGuard>,
	) -> Result<Self, ConfigError> {
		let tolerance_ms = u64::try_from(config.tolerance.whole_milliseconds())
			.ok()
			.filter(|ms| *ms > 0)
			.ok_or(ConfigError::InvalidTolerance)?;

		Ok(Self { config, tolerance_ms, replay })
	}

	/// Returns the configuration the verifier was built with.
	pub fn config(&self) -> &VerifierConfig {
		&self.config
	}

	/// Verifies `request` against the `provided` signature at instant `now`.
	pub fn verify(
		&self,
		request: &SignedRequest,
		provided: &str,
		now: OffsetDateTime,
	) -> Result<(), VerifyError> {
		self.observe("verify", || {
			let signature =
				Signature::parse(provided).map_err(|_| VerifyError::MalformedSignature)?;

			self.check(request, &signature, Timestamp::from_datetime(now))
		})
	}

	/// Boolean form of [`Verifier::verify`].
	pub fn is_authentic(&self, request: &SignedRequest, provided: &str, now: OffsetDateTime) -> bool {
		self.verify(request, provided, now).is_ok()
	}

	/// Verifies a request from its received method, path, body, and authentication headers.
	pub fn verify_headers(
		&self,
		method: &str,
		path: &str,
		body: &str,
		headers: &AuthHeaders,
		now: OffsetDateTime,
	) -> Result<(), VerifyError> {
		self.observe("verify_headers", || {
			if self
				.config
				.expected_client
				.as_ref()
				.is_some_and(|expected| headers.client.as_ref() != Some(expected))
			{
				return Err(VerifyError::ClientMismatch);
			}

			let request =
				SignedRequest::at(method, path, headers.timestamp, headers.nonce.clone())?
					.with_body(body);

			self.check(&request, &headers.signature, Timestamp::from_datetime(now))
		})
	}

	fn check(
		&self,
		request: &SignedRequest,
		signature: &Signature,
		now: Timestamp,
	) -> Result<(), VerifyError> {
		let skew_ms = request.timestamp.skew_from(now);

		if skew_ms > self.tolerance_ms {
			return Err(VerifyError::Stale { skew_ms, tolerance_ms: self.tolerance_ms });
		}

		let message = self.config.framing.message(request);
		let mac = signing::mac(&self.config.secret, &message)
			.map_err(|_| VerifyError::SignatureMismatch)?;

		mac.verify_slice(&signature.to_bytes()).map_err(|_| VerifyError::SignatureMismatch)?;

		let expires_at = request.timestamp.saturating_add(self.config.tolerance);

		match self.replay.check_and_record(&request.nonce, expires_at, now) {
			ReplayOutcome::Fresh => Ok(()),
			ReplayOutcome::Replayed => Err(VerifyError::Replayed),
			ReplayOutcome::CapacityExhausted => Err(VerifyError::ReplayCacheFull),
		}
	}

	fn observe<F>(&self, stage: &'static str, f: F) -> Result<(), VerifyError>
	where
		F: FnOnce() -> Result<(), VerifyError>,
	{
		let span = OpSpan::start(OpKind::Verify, stage);
		let _guard = span.entered();
		let result = f();

		span.finish(&result);

		if let Err(e) = &result {
			obs::record_rejection(e);
			obs::op_debug!(reason = e.label(), "request rejected");
		}

		result
	}
}
impl Debug for Verifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Verifier")
			.field("tolerance_ms", &self.tolerance_ms)
			.field("framing", &self.config.framing)
			.field("expected_client", &self.config.expected_client)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::signing::{Nonce, RequestSigner, SignerConfig};

	const NOW: OffsetDateTime = macros::datetime!(2023-11-14 22:13:20 UTC);

	fn secret() -> SecretKey {
		SecretKey::new("testsecret").expect("Secret fixture should be valid.")
	}

	fn request_at(millis: i64) -> SignedRequest {
		SignedRequest::at(
			"POST",
			"/wallets/transfer",
			Timestamp::from_millis(millis),
			Nonce::parse("deadbeefdeadbeef").expect("Nonce fixture should be valid."),
		)
		.expect("Request fixture should be valid.")
		.with_body("{\"amount\":1000}")
	}

	fn signature_for(request: &SignedRequest) -> String {
		RequestSigner::new(SignerConfig::new(secret()))
			.expect("Signer should build.")
			.sign(request)
			.expect("Signing should succeed.")
			.to_string()
	}

	#[test]
	fn tolerance_must_be_positive() {
		let config = VerifierConfig::new(secret()).with_tolerance(Duration::ZERO);

		assert!(matches!(Verifier::new(config), Err(ConfigError::InvalidTolerance)));

		let config = VerifierConfig::new(secret()).with_tolerance(Duration::seconds(-5));

		assert!(matches!(Verifier::new(config), Err(ConfigError::InvalidTolerance)));
	}

	#[test]
	fn skew_boundary_is_inclusive() {
		let verifier = Verifier::new(VerifierConfig::new(secret()).with_tolerance(Duration::SECOND))
			.expect("Verifier should build.");
		let edge = request_at(1_700_000_000_000 - 1_000);

		verifier.verify(&edge, &signature_for(&edge), NOW).expect("Skew equal to tolerance passes.");

		let past = request_at(1_700_000_000_000 - 1_001);

		assert_eq!(
			verifier.verify(&past, &signature_for(&past), NOW),
			Err(VerifyError::Stale { skew_ms: 1_001, tolerance_ms: 1_000 })
		);
	}

	#[test]
	fn stale_requests_do_not_touch_the_cache() {
		let cache = Arc::new(MemoryReplayCache::default());
		let verifier = Verifier::with_replay_guard(VerifierConfig::new(secret()), cache.clone())
			.expect("Verifier should build.");
		let stale = request_at(0);

		assert!(!verifier.is_authentic(&stale, &signature_for(&stale), NOW));
		assert!(cache.is_empty());
	}

	#[test]
	fn forged_signatures_do_not_consume_the_nonce() {
		let verifier =
			Verifier::new(VerifierConfig::new(secret())).expect("Verifier should build.");
		let request = request_at(1_700_000_000_000);

		assert_eq!(
			verifier.verify(&request, &"0".repeat(64), NOW),
			Err(VerifyError::SignatureMismatch)
		);
		assert_eq!(verifier.verify(&request, "not-hex", NOW), Err(VerifyError::MalformedSignature));
		verifier
			.verify(&request, &signature_for(&request), NOW)
			.expect("Genuine request should still pass after forged attempts.");
	}

	#[test]
	fn framing_mismatch_is_rejected() {
		let verifier = Verifier::new(
			VerifierConfig::new(secret()).with_framing(MessageFraming::LengthPrefixed),
		)
		.expect("Verifier should build.");
		let request = request_at(1_700_000_000_000);

		assert_eq!(
			verifier.verify(&request, &signature_for(&request), NOW),
			Err(VerifyError::SignatureMismatch)
		);
	}

	#[test]
	fn expected_client_is_enforced_on_headers() {
		let client = ClientId::new("sacco-app").expect("Client fixture should be valid.");
		let verifier = Verifier::new(VerifierConfig::new(secret()).require_client(client.clone()))
			.expect("Verifier should build.");
		let request = request_at(1_700_000_000_000);
		let signer = RequestSigner::new(SignerConfig::new(secret())).expect("Signer should build.");
		let mut headers = signer.auth_headers(&request).expect("Signing should succeed.");

		assert_eq!(
			verifier.verify_headers("POST", "/wallets/transfer", &request.body, &headers, NOW),
			Err(VerifyError::ClientMismatch)
		);

		headers.client = Some(client);

		verifier
			.verify_headers("POST", "/wallets/transfer", &request.body, &headers, NOW)
			.expect("Matching client header should pass.");
	}
}
