//! The five request fields bound by a signature.

// self
use crate::{
	_prelude::*,
	signing::{Nonce, Timestamp},
};

/// Errors raised when request fields cannot be signed as given.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RequestError {
	/// Method is empty or contains whitespace.
	#[error("HTTP method `{method}` is not a valid token.")]
	InvalidMethod {
		/// Offending method.
		method: String,
	},
	/// Path does not start with `/`.
	#[error("Request path `{path}` must start with `/`.")]
	RelativePath {
		/// Offending path.
		path: String,
	},
	/// Path carries a query string or fragment, which is never signed.
	#[error("Request path `{path}` must not carry a query or fragment.")]
	PathHasQuery {
		/// Offending path.
		path: String,
	},
}

/// Transient request description that is signed once and discarded.
///
/// `method` is signed exactly as given (callers fix the canonical case, usually uppercase),
/// `path` excludes scheme, host, and query, and `body` holds the exact serialized payload that
/// goes on the wire (empty when the request has no body).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
	/// HTTP verb as it appears on the wire.
	pub method: String,
	/// URI path as sent.
	pub path: String,
	/// Millisecond epoch captured at signing time.
	pub timestamp: Timestamp,
	/// Single-use nonce.
	pub nonce: Nonce,
	/// Serialized payload; empty for bodiless requests.
	pub body: String,
}
impl SignedRequest {
	/// Describes a bodiless request stamped with the current time and a fresh nonce.
	pub fn new(method: impl Into<String>, path: impl Into<String>) -> Result<Self, RequestError> {
		Self::at(method, path, Timestamp::now(), Nonce::generate())
	}

	/// Describes a bodiless request with caller-chosen timestamp and nonce.
	pub fn at(
		method: impl Into<String>,
		path: impl Into<String>,
		timestamp: Timestamp,
		nonce: Nonce,
	) -> Result<Self, RequestError> {
		let method = method.into();
		let path = path.into();

		validate_method(&method)?;
		validate_path(&path)?;

		Ok(Self { method, path, timestamp, nonce, body: String::new() })
	}

	/// Attaches the serialized payload.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();

		self
	}

	/// Returns true when the request carries a payload.
	pub fn has_body(&self) -> bool {
		!self.body.is_empty()
	}
}

fn validate_method(method: &str) -> Result<(), RequestError> {
	if method.is_empty() || !method.bytes().all(|b| b.is_ascii_graphic()) {
		return Err(RequestError::InvalidMethod { method: method.to_owned() });
	}

	Ok(())
}

pub(crate) fn validate_path(path: &str) -> Result<(), RequestError> {
	if !path.starts_with('/') {
		return Err(RequestError::RelativePath { path: path.to_owned() });
	}
	if path.contains(['?', '#']) {
		return Err(RequestError::PathHasQuery { path: path.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn nonce() -> Nonce {
		Nonce::parse("deadbeefdeadbeef").expect("Nonce fixture should be valid.")
	}

	#[test]
	fn request_fields_are_validated() {
		let ts = Timestamp::from_millis(1_700_000_000_000);

		assert!(matches!(
			SignedRequest::at("", "/wallets", ts, nonce()),
			Err(RequestError::InvalidMethod { .. })
		));
		assert!(matches!(
			SignedRequest::at("GE T", "/wallets", ts, nonce()),
			Err(RequestError::InvalidMethod { .. })
		));
		assert!(matches!(
			SignedRequest::at("GET", "wallets", ts, nonce()),
			Err(RequestError::RelativePath { .. })
		));
		assert!(matches!(
			SignedRequest::at("GET", "/wallets?page=2", ts, nonce()),
			Err(RequestError::PathHasQuery { .. })
		));
	}

	#[test]
	fn method_case_is_preserved() {
		let request = SignedRequest::at("get", "/wallets", Timestamp::from_millis(1), nonce())
			.expect("Lowercase methods are signed as given.");

		assert_eq!(request.method, "get");
		assert!(!request.has_body());
		assert!(request.with_body("{}").has_body());
	}
}
