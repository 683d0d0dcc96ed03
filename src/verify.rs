//! Verification of signed requests: signature recomputation, clock-skew window, and replay
//! cache.

pub mod replay;
pub mod verifier;

pub use replay::*;
pub use verifier::*;

// self
use crate::{_prelude::*, signing::RequestError};

/// Reasons a received request is rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerifyError {
	/// The request timestamp lies outside the replay window.
	#[error("Request timestamp is {skew_ms} ms away from now; tolerance is {tolerance_ms} ms.")]
	Stale {
		/// Absolute distance between the request timestamp and now.
		skew_ms: u64,
		/// Configured tolerance.
		tolerance_ms: u64,
	},
	/// The signature does not match the recomputed digest.
	#[error("Signature does not match the request.")]
	SignatureMismatch,
	/// The signature is not a 64-digit hex string.
	#[error("Signature is malformed.")]
	MalformedSignature,
	/// The nonce was already accepted inside the replay window.
	#[error("Nonce has already been used.")]
	Replayed,
	/// The replay cache is full; the request is refused rather than left unchecked.
	#[error("Replay cache is at capacity.")]
	ReplayCacheFull,
	/// The client header is missing or names a different caller.
	#[error("Client header does not match the expected caller.")]
	ClientMismatch,
	/// A required authentication header is absent.
	#[error("Header `{name}` is missing.")]
	MissingHeader {
		/// Header name.
		name: &'static str,
	},
	/// An authentication header cannot be parsed.
	#[error("Header `{name}` is malformed.")]
	MalformedHeader {
		/// Header name.
		name: &'static str,
	},
	/// The received method or path cannot form a signing message.
	#[error(transparent)]
	InvalidRequest(#[from] RequestError),
}
impl VerifyError {
	/// Returns a stable label suitable for metric fields.
	pub const fn label(&self) -> &'static str {
		match self {
			Self::Stale { .. } => "stale",
			Self::SignatureMismatch => "signature_mismatch",
			Self::MalformedSignature => "malformed_signature",
			Self::Replayed => "replayed",
			Self::ReplayCacheFull => "replay_cache_full",
			Self::ClientMismatch => "client_mismatch",
			Self::MissingHeader { .. } => "missing_header",
			Self::MalformedHeader { .. } => "malformed_header",
			Self::InvalidRequest(_) => "invalid_request",
		}
	}
}
