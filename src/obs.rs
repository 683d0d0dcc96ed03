//! Optional observability hooks for signing, verification, and dispatch.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `hmac_request_signer.op` with the `op`
//!   (operation), `stage` (call site), and `outcome` fields, plus debug events for rejected
//!   verifications and probed endpoints.
//! - Enable `metrics` to increment:
//!   - `hmac_request_signer_op_total{op, outcome}` for every attempt/success/failure;
//!   - `hmac_request_signer_rejection_total{reason}` for every failed verification;
//!   - `hmac_request_signer_probe_total{outcome}` for every probed endpoint.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Signature computation.
	Sign,
	/// Inbound request verification.
	Verify,
	/// Signed HTTP dispatch.
	Dispatch,
	/// Endpoint probing run.
	Probe,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Sign => "sign",
			OpKind::Verify => "verify",
			OpKind::Dispatch => "dispatch",
			OpKind::Probe => "probe",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
