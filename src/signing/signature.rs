//! HMAC-SHA256 digests rendered as lowercase hex.

// self
use crate::_prelude::*;

/// Length of a rendered signature in hex characters.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Lowercase hex HMAC-SHA256 digest of a signing message.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(String);
impl Signature {
	pub(crate) fn from_digest(digest: &[u8]) -> Self {
		Self(hex::encode(digest))
	}

	/// Parses a received signature. Accepts exactly 64 hex digits and normalizes to lowercase.
	pub fn parse(value: impl AsRef<str>) -> Result<Self, SignatureError> {
		let view = value.as_ref();

		if view.len() != SIGNATURE_HEX_LEN || !view.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(SignatureError::Malformed);
		}

		Ok(Self(view.to_ascii_lowercase()))
	}

	/// Returns the hex form.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Decodes the digest bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		// Validated on construction, so decoding cannot fail.
		hex::decode(&self.0).unwrap_or_default()
	}
}
impl AsRef<str> for Signature {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Signature> for String {
	fn from(value: Signature) -> Self {
		value.0
	}
}
impl TryFrom<String> for Signature {
	type Error = SignatureError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
impl FromStr for Signature {
	type Err = SignatureError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Signature({})", self.0)
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Error returned when a received signature is not a 64-digit hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum SignatureError {
	/// Wrong length or non-hex characters.
	#[error("Signature must be 64 hex characters.")]
	Malformed,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_normalizes_case_and_rejects_garbage() {
		let upper = "3EC34A457CE2064B6E19FBFE3A8FE1285234826D25E1D0837F9F099D18BD2B99";
		let parsed = Signature::parse(upper).expect("Uppercase hex should parse.");

		assert_eq!(parsed.as_str(), upper.to_ascii_lowercase());
		assert_eq!(parsed.to_bytes().len(), 32);
		assert_eq!(Signature::parse(&upper[..63]), Err(SignatureError::Malformed));
		assert_eq!(Signature::parse("g".repeat(64)), Err(SignatureError::Malformed));
	}
}
