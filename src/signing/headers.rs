//! Authentication header contract shared by signers and verifiers.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
// self
#[cfg(feature = "reqwest")] use crate::error::ConfigError;
use crate::{
	_prelude::*,
	auth::ClientId,
	signing::{Nonce, Signature, Timestamp},
	verify::VerifyError,
};

/// Millisecond epoch timestamp header.
pub const TIMESTAMP_HEADER: &str = "x-auth-timestamp";
/// Per-request nonce header.
pub const NONCE_HEADER: &str = "x-auth-nonce";
/// HMAC signature header.
pub const SIGNATURE_HEADER: &str = "x-auth-signature";
/// Optional caller identity header.
pub const CLIENT_HEADER: &str = "x-auth-client";

/// Header set attached to a signed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeaders {
	/// Value of [`TIMESTAMP_HEADER`].
	pub timestamp: Timestamp,
	/// Value of [`NONCE_HEADER`].
	pub nonce: Nonce,
	/// Value of [`SIGNATURE_HEADER`].
	pub signature: Signature,
	/// Value of [`CLIENT_HEADER`], when the deployment sends it.
	pub client: Option<ClientId>,
}
impl AuthHeaders {
	/// Renders the header set as `(name, value)` pairs in a stable order.
	pub fn pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![
			(TIMESTAMP_HEADER, self.timestamp.to_string()),
			(NONCE_HEADER, self.nonce.to_string()),
			(SIGNATURE_HEADER, self.signature.to_string()),
		];

		if let Some(client) = &self.client {
			pairs.push((CLIENT_HEADER, client.to_string()));
		}

		pairs
	}

	/// Parses a received header set through a case-insensitive `lookup`.
	pub fn from_lookup<'a, F>(lookup: F) -> Result<Self, VerifyError>
	where
		F: Fn(&str) -> Option<&'a str>,
	{
		let required = |name: &'static str| {
			lookup(name).map(str::trim).ok_or(VerifyError::MissingHeader { name })
		};
		let timestamp = required(TIMESTAMP_HEADER)?
			.parse()
			.map_err(|_| VerifyError::MalformedHeader { name: TIMESTAMP_HEADER })?;
		let nonce = Nonce::parse(required(NONCE_HEADER)?)
			.map_err(|_| VerifyError::MalformedHeader { name: NONCE_HEADER })?;
		let signature = Signature::parse(required(SIGNATURE_HEADER)?)
			.map_err(|_| VerifyError::MalformedSignature)?;
		let client = lookup(CLIENT_HEADER)
			.map(|value| ClientId::new(value.trim()))
			.transpose()
			.map_err(|_| VerifyError::MalformedHeader { name: CLIENT_HEADER })?;

		Ok(Self { timestamp, nonce, signature, client })
	}
}
#[cfg(feature = "reqwest")]
impl AuthHeaders {
	/// Renders the header set into a reqwest [`HeaderMap`].
	pub fn to_header_map(&self) -> Result<HeaderMap, ConfigError> {
		let mut map = HeaderMap::with_capacity(4);

		for (name, value) in self.pairs() {
			let value = HeaderValue::from_str(&value)
				.map_err(|_| ConfigError::InvalidHeaderValue { name })?;

			map.insert(HeaderName::from_static(name), value);
		}

		Ok(map)
	}
}
#[cfg(feature = "reqwest")]
impl TryFrom<&HeaderMap> for AuthHeaders {
	type Error = VerifyError;

	fn try_from(map: &HeaderMap) -> Result<Self, Self::Error> {
		Self::from_lookup(|name| map.get(name).and_then(|value| value.to_str().ok()))
	}
}
