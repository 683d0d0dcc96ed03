//! Stateless request signer built from injected configuration.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, SecretKey},
	error::ConfigError,
	obs::{OpKind, OpSpan},
	signing::{AuthHeaders, MessageFraming, Signature, SignedRequest},
};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Configuration injected into a [`RequestSigner`].
#[derive(Clone, Debug)]
pub struct SignerConfig {
	/// Shared symmetric key.
	pub secret: SecretKey,
	/// Caller identity sent when `include_client_header` is on.
	pub client_id: Option<ClientId>,
	/// Whether the deployment's auth variant requires the client header.
	pub include_client_header: bool,
	/// Signing message layout.
	pub framing: MessageFraming,
}
impl SignerConfig {
	/// Creates a configuration that signs with `secret` and omits the client header.
	pub fn new(secret: SecretKey) -> Self {
		Self {
			secret,
			client_id: None,
			include_client_header: false,
			framing: MessageFraming::default(),
		}
	}

	/// Attaches a client identifier and enables the client header.
	pub fn with_client_header(mut self, client_id: ClientId) -> Self {
		self.client_id = Some(client_id);
		self.include_client_header = true;

		self
	}

	/// Overrides the signing message layout.
	pub fn with_framing(mut self, framing: MessageFraming) -> Self {
		self.framing = framing;

		self
	}
}

/// Pure HMAC-SHA256 signer; safe to share across threads without synchronization.
#[derive(Clone, Debug)]
pub struct RequestSigner {
	config: SignerConfig,
}
impl RequestSigner {
	/// Creates a signer, rejecting a client-header flag without a client identifier.
	pub fn new(config: SignerConfig) -> Result<Self, ConfigError> {
		if config.include_client_header && config.client_id.is_none() {
			return Err(ConfigError::MissingClientId);
		}

		Ok(Self { config })
	}

	/// Returns the configuration the signer was built with.
	pub fn config(&self) -> &SignerConfig {
		&self.config
	}

	/// Computes the signature for `request`.
	pub fn sign(&self, request: &SignedRequest) -> Result<Signature> {
		let span = OpSpan::start(OpKind::Sign, "sign");
		let _guard = span.entered();
		let result = compute(&self.config.secret, &self.config.framing.message(request));

		span.finish(&result);

		result
	}

	/// Builds the authentication header set for `request`.
	pub fn auth_headers(&self, request: &SignedRequest) -> Result<AuthHeaders> {
		let signature = self.sign(request)?;
		let client = if self.config.include_client_header {
			self.config.client_id.clone()
		} else {
			None
		};

		Ok(AuthHeaders {
			timestamp: request.timestamp,
			nonce: request.nonce.clone(),
			signature,
			client,
		})
	}
}

/// Keyed MAC over `message`, shared with the verifier.
pub(crate) fn mac(secret: &SecretKey, message: &[u8]) -> Result<HmacSha256> {
	// Infallible for HMAC, which accepts keys of any length.
	let mut mac =
		<HmacSha256 as Mac>::new_from_slice(secret.expose()).map_err(|_| ConfigError::EmptySecret)?;

	mac.update(message);

	Ok(mac)
}

fn compute(secret: &SecretKey, message: &[u8]) -> Result<Signature> {
	let digest = mac(secret, message)?.finalize().into_bytes();

	Ok(Signature::from_digest(&digest))
}
