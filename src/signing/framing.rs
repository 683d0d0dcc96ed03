//! Byte layout of the signing message.

// self
use crate::{_prelude::*, signing::SignedRequest};

/// How the five request fields are laid out before hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFraming {
	/// `method ‖ path ‖ timestamp ‖ nonce ‖ body` with no separators.
	///
	/// Compatible with existing remote verifiers. Field boundaries are not encoded, so
	/// distinct requests can share a message when a field absorbs its neighbour's prefix.
	#[default]
	Concatenated,
	/// Each field preceded by its byte length as a big-endian `u64`.
	///
	/// Unambiguous; only usable when both sides are built with it.
	LengthPrefixed,
}
impl MessageFraming {
	/// Builds the signing message for `request`.
	pub fn message(self, request: &SignedRequest) -> Vec<u8> {
		let timestamp = request.timestamp.to_string();
		let fields: [&[u8]; 5] = [
			request.method.as_bytes(),
			request.path.as_bytes(),
			timestamp.as_bytes(),
			request.nonce.as_str().as_bytes(),
			request.body.as_bytes(),
		];
		let payload_len = fields.iter().map(|f| f.len()).sum::<usize>();

		match self {
			Self::Concatenated => {
				let mut buf = Vec::with_capacity(payload_len);

				for field in fields {
					buf.extend_from_slice(field);
				}

				buf
			},
			Self::LengthPrefixed => {
				let mut buf = Vec::with_capacity(payload_len + fields.len() * 8);

				for field in fields {
					buf.extend_from_slice(&(field.len() as u64).to_be_bytes());
					buf.extend_from_slice(field);
				}

				buf
			},
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Concatenated => "concatenated",
			Self::LengthPrefixed => "length_prefixed",
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::signing::{Nonce, Timestamp};

	fn request(path: &str, body: &str) -> SignedRequest {
		SignedRequest::at(
			"GET",
			path,
			Timestamp::from_millis(1_700_000_000_000),
			Nonce::parse("deadbeefdeadbeef").expect("Nonce fixture should be valid."),
		)
		.expect("Request fixture should be valid.")
		.with_body(body)
	}

	#[test]
	fn concatenated_framing_has_no_separators() {
		let message = MessageFraming::Concatenated.message(&request("/wallets", ""));

		assert_eq!(message, b"GET/wallets1700000000000deadbeefdeadbeef");
	}

	#[test]
	fn length_prefixed_framing_encodes_boundaries() {
		let message = MessageFraming::LengthPrefixed.message(&request("/wallets", "{}"));

		assert_eq!(&message[..8], &3_u64.to_be_bytes());
		assert_eq!(&message[8..11], b"GET");
		assert_eq!(&message[11..19], &8_u64.to_be_bytes());
		assert_eq!(message.len(), 5 * 8 + 3 + 8 + 13 + 16 + 2);
	}

	#[test]
	fn length_prefixed_framing_separates_colliding_fields() {
		// Shifting a character across the method/path boundary.
		let mut a = request("/wallets", "x");
		let mut b = request("/wallets", "x");

		a.method = "GETX".into();
		b.path = "X/wallets".into();

		assert_ne!(
			MessageFraming::LengthPrefixed.message(&a),
			MessageFraming::LengthPrefixed.message(&b)
		);
		assert_eq!(
			MessageFraming::Concatenated.message(&a),
			MessageFraming::Concatenated.message(&b)
		);
	}
}
