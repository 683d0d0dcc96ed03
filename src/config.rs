//! Client configuration: target API, caller identity, shared key, and transport limits.
//!
//! The secret is injected into signers through this value instead of being read from the
//! environment at signing time. [`ClientConfig::from_env`] is the only place that touches
//! process environment, and it runs once at startup.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, SecretKey},
	error::ConfigError,
	signing::{MessageFraming, SignerConfig},
};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "BITNOB";

/// Validated configuration for a signed API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL of the target API; its path is prepended to every request path.
	pub base_url: Url,
	/// Caller identity.
	pub client_id: ClientId,
	/// Shared symmetric key.
	pub secret: SecretKey,
	/// Whether to send the client header.
	pub include_client_header: bool,
	/// Signing message layout.
	pub framing: MessageFraming,
	/// Per-request timeout.
	pub timeout: Duration,
}
impl ClientConfig {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates a builder seeded with the three required values.
	pub fn builder(base_url: Url, client_id: ClientId, secret: SecretKey) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url, client_id, secret)
	}

	/// Loads configuration from the process environment with the [`DEFAULT_ENV_PREFIX`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_prefixed(DEFAULT_ENV_PREFIX)
	}

	/// Loads configuration from the process environment, reading a `.env` file first when one
	/// exists.
	///
	/// Reads `{prefix}_BASE_URL`, `{prefix}_CLIENT_ID`, and `{prefix}_SECRET_KEY` (required) plus
	/// `{prefix}_INCLUDE_CLIENT_HEADER` and `{prefix}_TIMEOUT_MS` (optional).
	pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
		// A missing .env file is the normal case in deployed environments.
		dotenvy::dotenv().ok();

		Self::from_lookup(prefix, |name| std::env::var(name).ok())
	}

	/// Loads configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |suffix: &str| {
			let name = format!("{prefix}_{suffix}");

			(lookup(&name).filter(|value| !value.trim().is_empty()), name)
		};
		let required = |suffix: &str| match var(suffix) {
			(Some(value), _) => Ok(value),
			(None, name) => Err(ConfigError::MissingVar { name }),
		};
		let base_url = required("BASE_URL")?;
		let client_id = required("CLIENT_ID")?;
		let secret = required("SECRET_KEY")?;
		let base_url =
			Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl { source })?;
		let mut builder =
			Self::builder(base_url, ClientId::new(client_id.trim())?, SecretKey::new(secret)?);

		if let (Some(raw), name) = var("INCLUDE_CLIENT_HEADER") {
			builder = builder.include_client_header(parse_flag(&raw, name)?);
		}
		if let (Some(raw), name) = var("TIMEOUT_MS") {
			let millis =
				raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidVar { name })?;

			builder = builder.timeout(Duration::milliseconds(millis));
		}

		builder.build()
	}

	/// Derives the signer configuration.
	pub fn signer_config(&self) -> SignerConfig {
		SignerConfig {
			secret: self.secret.clone(),
			client_id: Some(self.client_id.clone()),
			include_client_header: self.include_client_header,
			framing: self.framing,
		}
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	client_id: ClientId,
	secret: SecretKey,
	include_client_header: bool,
	framing: MessageFraming,
	timeout: Duration,
}
impl ClientConfigBuilder {
	fn new(base_url: Url, client_id: ClientId, secret: SecretKey) -> Self {
		Self {
			base_url,
			client_id,
			secret,
			include_client_header: false,
			framing: MessageFraming::default(),
			timeout: ClientConfig::DEFAULT_TIMEOUT,
		}
	}

	/// Toggles the client header.
	pub fn include_client_header(mut self, include: bool) -> Self {
		self.include_client_header = include;

		self
	}

	/// Overrides the signing message layout.
	pub fn framing(mut self, framing: MessageFraming) -> Self {
		self.framing = framing;

		self
	}

	/// Overrides the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		validate_base_url(&self.base_url)?;

		if !self.timeout.is_positive() {
			return Err(ConfigError::InvalidTimeout);
		}

		Ok(ClientConfig {
			base_url: self.base_url,
			client_id: self.client_id,
			secret: self.secret,
			include_client_header: self.include_client_header,
			framing: self.framing,
			timeout: self.timeout,
		})
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::BaseUrlHasQuery { url: url.to_string() });
	}

	Ok(())
}

fn parse_flag(raw: &str, name: String) -> Result<bool, ConfigError> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ConfigError::InvalidVar { name }),
	}
}
