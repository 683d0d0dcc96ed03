// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome},
};

/// Future returned by [`OpSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OpSpan::instrument`]; the input future itself without tracing.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// One observed operation.
///
/// [`OpSpan::start`] counts the attempt and opens a `hmac_request_signer.op` span with `op`,
/// `stage`, and an empty `outcome` field; [`OpSpan::finish`] fills `outcome` and counts the
/// result. Both halves are no-ops when the matching feature is off.
#[derive(Clone, Debug)]
pub struct OpSpan {
	kind: OpKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Counts an attempt of `kind` and opens its span.
	pub fn start(kind: OpKind, stage: &'static str) -> Self {
		obs::record_op_outcome(kind, OpOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"hmac_request_signer.op",
				op = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Enters the span for a synchronous section.
	pub fn entered(&self) -> OpSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OpSpanGuard { _guard: self.span.clone().entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			OpSpanGuard {}
		}
	}

	/// Attaches the span to `fut` so no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records success or failure from `result`.
	pub fn finish<T, E>(&self, result: &Result<T, E>) {
		self.finish_with(if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure });
	}

	/// Records an explicit outcome.
	pub fn finish_with(&self, outcome: OpOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}

		obs::record_op_outcome(self.kind, outcome);
	}
}

/// Guard returned by [`OpSpan::entered`]; the span is exited on drop.
pub struct OpSpanGuard {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::EnteredSpan,
}
impl Debug for OpSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OpSpanGuard(..)")
	}
}

/// Emits a debug event inside the current span (when enabled).
macro_rules! op_debug {
	($($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)*);
		}
	}};
}
pub(crate) use op_debug;
