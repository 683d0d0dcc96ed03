//! Shared signing key wrapper that redacts sensitive material.

// self
use crate::{_prelude::*, error::ConfigError};

/// Symmetric key shared by the signer and the verifier.
///
/// The key is guaranteed non-empty, so anything holding a `SecretKey` can sign.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);
impl SecretKey {
	/// Wraps a secret, rejecting empty values.
	pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
		let value = value.into();

		if value.is_empty() {
			return Err(ConfigError::EmptySecret);
		}

		Ok(Self(value))
	}

	/// Returns the raw key bytes for MAC computation. Callers must never log them.
	pub fn expose(&self) -> &[u8] {
		self.0.as_bytes()
	}
}
impl Debug for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretKey").field(&"<redacted>").finish()
	}
}
impl Display for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
impl TryFrom<String> for SecretKey {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl TryFrom<&str> for SecretKey {
	type Error = ConfigError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretKey::new("super-secret").expect("Secret fixture should be valid.");

		assert_eq!(format!("{secret:?}"), "SecretKey(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), b"super-secret");
	}

	#[test]
	fn empty_secret_is_a_configuration_error() {
		assert!(matches!(SecretKey::new(""), Err(ConfigError::EmptySecret)));
	}
}
