//! Request signing: the signing message, its HMAC-SHA256 signature, and the header set that
//! carries it.
//!
//! A signature binds one request to one moment and one nonce:
//!
//! ```text
//! signature = hex(HMAC-SHA256(secret, method ‖ path ‖ timestamp ‖ nonce ‖ body))
//! ```
//!
//! [`RequestSigner`] holds the injected [`SignerConfig`] and never touches ambient state, so it
//! is a pure function of its inputs. The free [`sign`] function exposes the same computation
//! for callers that hold the raw fields.

pub mod framing;
pub mod headers;
pub mod nonce;
pub mod request;
pub mod signature;
pub mod signer;
pub mod timestamp;

pub use framing::*;
pub use headers::*;
pub use nonce::*;
pub use request::*;
pub use signature::*;
pub use signer::*;
pub use timestamp::*;

// self
use crate::{_prelude::*, auth::SecretKey};

/// Signs the raw request fields with the concatenated framing.
///
/// Fails with a configuration error when `secret` is empty, and with a request error when the
/// method or path cannot be signed.
pub fn sign(
	method: &str,
	path: &str,
	timestamp: Timestamp,
	nonce: &Nonce,
	body: &str,
	secret: &str,
) -> Result<Signature> {
	let secret = SecretKey::new(secret)?;
	let request = SignedRequest::at(method, path, timestamp, nonce.clone())?.with_body(body);

	RequestSigner::new(SignerConfig::new(secret))?.sign(&request)
}

/// Builds the header set for `request` without the client header.
///
/// Deployments that send the client header go through [`RequestSigner::auth_headers`] with
/// [`SignerConfig::with_client_header`].
pub fn build_auth_headers(request: &SignedRequest, secret: &str) -> Result<AuthHeaders> {
	RequestSigner::new(SignerConfig::new(SecretKey::new(secret)?))?.auth_headers(request)
}
