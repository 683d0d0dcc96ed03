//! Single-use request nonces.

// crates.io
use rand::RngCore;
// self
use crate::_prelude::*;

/// Random bytes drawn for each generated nonce.
pub const NONCE_BYTES: usize = 16;
/// Minimum entropy accepted from a peer, in bytes.
pub const MIN_NONCE_BYTES: usize = 8;
/// Maximum nonce size accepted from a peer, in bytes.
pub const MAX_NONCE_BYTES: usize = 64;

/// Hex-encoded random value used at most once per key within the replay window.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce(String);
impl Nonce {
	/// Draws [`NONCE_BYTES`] bytes from the thread-local CSPRNG.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; NONCE_BYTES];

		rand::rng().fill_bytes(&mut bytes);

		Self(hex::encode(bytes))
	}

	/// Parses a received nonce, enforcing hex encoding and the size bounds.
	pub fn parse(value: impl AsRef<str>) -> Result<Self, NonceError> {
		let view = value.as_ref();

		validate(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the hex form exactly as it is signed and sent.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Nonce {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Nonce> for String {
	fn from(value: Nonce) -> Self {
		value.0
	}
}
impl TryFrom<String> for Nonce {
	type Error = NonceError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for Nonce {
	type Err = NonceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Debug for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Nonce({})", self.0)
	}
}
impl Display for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Error returned when a nonce fails validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum NonceError {
	/// The nonce contains characters outside `[0-9a-fA-F]` or has odd length.
	#[error("Nonce must be an even-length hex string.")]
	NotHex,
	/// The nonce carries too little entropy.
	#[error("Nonce must encode at least {min} bytes.")]
	TooShort {
		/// Minimum byte count.
		min: usize,
	},
	/// The nonce is larger than any sane peer would send.
	#[error("Nonce must encode at most {max} bytes.")]
	TooLong {
		/// Maximum byte count.
		max: usize,
	},
}

fn validate(view: &str) -> Result<(), NonceError> {
	if view.len() % 2 != 0 || !view.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(NonceError::NotHex);
	}

	let bytes = view.len() / 2;

	if bytes < MIN_NONCE_BYTES {
		return Err(NonceError::TooShort { min: MIN_NONCE_BYTES });
	}
	if bytes > MAX_NONCE_BYTES {
		return Err(NonceError::TooLong { max: MAX_NONCE_BYTES });
	}

	Ok(())
}
