//! Crate-level error types shared by the signer, verifier, and HTTP client.

// self
use crate::{_prelude::*, auth::IdentifierError, signing::RequestError, verify::VerifyError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; nothing was sent.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request fields cannot be signed as given.
	#[error(transparent)]
	Request(#[from] RequestError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Inbound request failed verification.
	#[error(transparent)]
	Verification(#[from] VerifyError),

	/// Remote party rejected the signature or credentials.
	#[error("Remote rejected the request credentials with status {status}.")]
	AuthenticationRejected {
		/// HTTP status code (usually 401 or 403).
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Remote party reports the resource does not exist.
	#[error("Endpoint {method} {path} does not exist (status {status}).")]
	UnknownEndpoint {
		/// HTTP method of the request.
		method: String,
		/// Signed request path.
		path: String,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Any other non-success status, surfaced untransformed.
	#[error("Remote returned an unexpected status {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Response body could not be decoded into the requested type.
	#[error("Response body is not the expected JSON shape.")]
	ResponseParse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// Returns true when a retry with a fresh timestamp + nonce may succeed.
	///
	/// Only connection-level failures qualify. Timeouts are excluded because the remote may have
	/// applied the operation; callers must check remote state before retrying those.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(TransportError::Network { .. }))
	}

	/// Returns true when the remote outcome of the request cannot be known.
	pub fn is_outcome_unknown(&self) -> bool {
		matches!(self, Self::Transport(TransportError::Timeout { .. }))
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Configuration and validation failures; fatal before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Secret key is absent or empty.
	#[error("Secret key is missing or empty.")]
	EmptySecret,
	/// A required configuration variable is not set.
	#[error("Required configuration variable `{name}` is not set.")]
	MissingVar {
		/// Variable name.
		name: String,
	},
	/// A configuration variable could not be parsed.
	#[error("Configuration variable `{name}` has an invalid value.")]
	InvalidVar {
		/// Variable name.
		name: String,
	},
	/// Client identifier failed validation.
	#[error("Client identifier is invalid.")]
	InvalidClientId(#[from] IdentifierError),
	/// The client header was requested but no client identifier is configured.
	#[error("Client header is enabled but no client identifier is configured.")]
	MissingClientId,
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// Base URL carries a query or fragment.
	#[error("Base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Offending URL.
		url: String,
	},
	/// Timeout must be positive.
	#[error("Request timeout must be positive.")]
	InvalidTimeout,
	/// Replay tolerance must be positive.
	#[error("Replay tolerance must be positive.")]
	InvalidTolerance,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized as JSON.")]
	InvalidBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// A header value could not be encoded.
	#[error("Header `{name}` has a value that cannot be sent.")]
	InvalidHeaderValue {
		/// Header name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connection-level failure; the request never reached the remote application.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request timed out; whether the remote applied it is unknown.
	#[error("Request to {url} timed out; the remote outcome is unknown.")]
	Timeout {
		/// Target URL.
		url: String,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { url: url.into(), source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		let url = e.url().map(ToString::to_string).unwrap_or_default();

		if e.is_timeout() { Self::timeout(url, e) } else { Self::network(url, e) }
	}
}
