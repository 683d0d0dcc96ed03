// self
use crate::{
	obs::{OpKind, OpOutcome},
	probe::ProbeOutcome,
	verify::VerifyError,
};

/// Counts one attempt/success/failure of `kind` (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"hmac_request_signer_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a rejected verification by reason (when enabled).
pub fn record_rejection(error: &VerifyError) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("hmac_request_signer_rejection_total", "reason" => error.label())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = error;
	}
}

/// Counts a probed endpoint by how the remote answered (when enabled).
pub fn record_probe(outcome: &ProbeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("hmac_request_signer_probe_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
