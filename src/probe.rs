//! Endpoint discovery against a signed API.
//!
//! A probe walks a list of candidate endpoints with the same credentials the client uses in
//! production and records how the remote answered each one. Calls run sequentially with a fixed
//! pause between them so the remote's rate limiter is never tripped by discovery traffic.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::Method;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use crate::{
	config::ClientConfig,
	error::ConfigError,
	http::ApiClient,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Candidate endpoint to probe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
	/// HTTP verb.
	pub method: String,
	/// Request path relative to the client's base URL.
	pub path: String,
	/// Serialized JSON payload, when the endpoint expects one.
	pub body: Option<String>,
}
impl ProbeTarget {
	/// Bodiless `GET` target.
	pub fn get(path: impl Into<String>) -> Self {
		Self { method: "GET".into(), path: path.into(), body: None }
	}

	/// `POST` target carrying an already serialized JSON payload.
	pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
		Self { method: "POST".into(), path: path.into(), body: Some(body.into()) }
	}
}
impl Display for ProbeTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}", self.method, self.path)
	}
}

/// How the remote answered a probe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
	/// 2xx response.
	Available {
		/// HTTP status code.
		status: u16,
	},
	/// 401 or 403 response.
	AuthenticationRejected {
		/// HTTP status code.
		status: u16,
	},
	/// 404 response.
	UnknownEndpoint {
		/// HTTP status code.
		status: u16,
	},
	/// Any other status.
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
	},
	/// The request timed out.
	TimedOut,
	/// The request never reached the remote application.
	NetworkFailure {
		/// Rendered transport error.
		message: String,
	},
	/// The target could not be signed or sent as described.
	InvalidTarget {
		/// Rendered local error.
		message: String,
	},
}
impl ProbeOutcome {
	/// Classifies a received status code.
	pub fn from_status(status: u16) -> Self {
		match status {
			200..=299 => Self::Available { status },
			401 | 403 => Self::AuthenticationRejected { status },
			404 => Self::UnknownEndpoint { status },
			status => Self::UnexpectedStatus { status },
		}
	}

	/// Classifies a failed call.
	pub fn from_error(error: &Error) -> Self {
		match error {
			Error::Transport(TransportError::Timeout { .. }) => Self::TimedOut,
			Error::Transport(e @ TransportError::Network { .. }) => {
				Self::NetworkFailure { message: e.to_string() }
			},
			Error::AuthenticationRejected { status, .. }
			| Error::UnknownEndpoint { status, .. }
			| Error::UnexpectedStatus { status, .. }
			| Error::ResponseParse { status, .. } => Self::from_status(*status),
			e => Self::InvalidTarget { message: e.to_string() },
		}
	}

	/// Returns true for a 2xx answer.
	pub fn is_available(&self) -> bool {
		matches!(self, Self::Available { .. })
	}

	/// Status code, when the remote answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Available { status }
			| Self::AuthenticationRejected { status }
			| Self::UnknownEndpoint { status }
			| Self::UnexpectedStatus { status } => Some(*status),
			_ => None,
		}
	}

	/// Stable label for logs and reports.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Available { .. } => "available",
			Self::AuthenticationRejected { .. } => "authentication_rejected",
			Self::UnknownEndpoint { .. } => "unknown_endpoint",
			Self::UnexpectedStatus { .. } => "unexpected_status",
			Self::TimedOut => "timed_out",
			Self::NetworkFailure { .. } => "network_failure",
			Self::InvalidTarget { .. } => "invalid_target",
		}
	}
}

/// Authentication header layout used for a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthVariant {
	/// Timestamp, nonce, signature, and client headers.
	WithClientHeader,
	/// Timestamp, nonce, and signature headers only.
	WithoutClientHeader,
}
impl AuthVariant {
	/// Maps the signer's `include_client_header` flag to a variant.
	pub const fn from_flag(include_client_header: bool) -> Self {
		if include_client_header { Self::WithClientHeader } else { Self::WithoutClientHeader }
	}

	/// Returns the signer flag for this variant.
	pub const fn includes_client_header(self) -> bool {
		matches!(self, Self::WithClientHeader)
	}
}

/// One probed call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeEntry {
	/// What was called.
	pub target: ProbeTarget,
	/// Header layout the call was signed with.
	pub variant: AuthVariant,
	/// How the remote answered.
	pub outcome: ProbeOutcome,
}

/// Ordered results of a probe run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
	/// Entries in the order the calls were made.
	pub entries: Vec<ProbeEntry>,
}
impl ProbeReport {
	/// Entries the remote answered with 2xx.
	pub fn available(&self) -> impl Iterator<Item = &ProbeEntry> {
		self.entries.iter().filter(|entry| entry.outcome.is_available())
	}

	/// Variants that produced at least one 2xx answer, in first-seen order.
	pub fn accepted_variants(&self) -> Vec<AuthVariant> {
		let mut variants = Vec::new();

		for entry in self.available() {
			if !variants.contains(&entry.variant) {
				variants.push(entry.variant);
			}
		}

		variants
	}

	#[cfg(feature = "reqwest")]
	fn extend(&mut self, other: ProbeReport) {
		self.entries.extend(other.entries);
	}
}

/// Sequential prober sharing one [`ApiClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct EndpointProbe {
	client: ApiClient,
	delay: std::time::Duration,
}
#[cfg(feature = "reqwest")]
impl EndpointProbe {
	/// Pause between consecutive calls unless overridden.
	pub const DEFAULT_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

	/// Wraps `client` with the default delay.
	pub fn new(client: ApiClient) -> Self {
		Self { client, delay: Self::DEFAULT_DELAY }
	}

	/// Overrides the pause between consecutive calls.
	pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
		self.delay = delay;

		self
	}

	/// Probes every target in order, pausing between calls.
	pub async fn run<I>(&self, targets: I) -> ProbeReport
	where
		I: IntoIterator<Item = ProbeTarget>,
	{
		let variant = AuthVariant::from_flag(self.client.signer().config().include_client_header);
		let mut report = ProbeReport::default();

		for (i, target) in targets.into_iter().enumerate() {
			if i > 0 && !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			let span = OpSpan::start(OpKind::Probe, "target");
			let outcome = span.instrument(self.probe_one(&target)).await;

			span.finish_with(if outcome.status().is_some() {
				OpOutcome::Success
			} else {
				OpOutcome::Failure
			});
			obs::record_probe(&outcome);
			obs::op_debug!(target = %target, outcome = outcome.as_str(), "probed endpoint");

			report.entries.push(ProbeEntry { target, variant, outcome });
		}

		report
	}

	async fn probe_one(&self, target: &ProbeTarget) -> ProbeOutcome {
		let Ok(method) = Method::from_bytes(target.method.as_bytes()) else {
			return ProbeOutcome::InvalidTarget {
				message: format!("HTTP method `{}` is not a valid token.", target.method),
			};
		};

		match self.client.execute(method, &target.path, target.body.clone()).await {
			Ok(response) => ProbeOutcome::from_status(response.status),
			Err(e) => ProbeOutcome::from_error(&e),
		}
	}
}

/// Calls `target` once with and once without the client header, using a fresh transport.
#[cfg(feature = "reqwest")]
pub async fn probe_auth_variants(
	config: &ClientConfig,
	target: &ProbeTarget,
	delay: std::time::Duration,
) -> Result<ProbeReport> {
	let http = ReqwestClient::builder()
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.map_err(ConfigError::http_client_build)?;

	probe_auth_variants_with_client(config, http, target, delay).await
}

/// Same as [`probe_auth_variants`] over an existing reqwest [`ReqwestClient`].
#[cfg(feature = "reqwest")]
pub async fn probe_auth_variants_with_client(
	config: &ClientConfig,
	http: ReqwestClient,
	target: &ProbeTarget,
	delay: std::time::Duration,
) -> Result<ProbeReport> {
	let mut report = ProbeReport::default();

	for (i, variant) in [AuthVariant::WithClientHeader, AuthVariant::WithoutClientHeader]
		.into_iter()
		.enumerate()
	{
		let config = ClientConfig {
			include_client_header: variant.includes_client_header(),
			..config.clone()
		};
		let probe = EndpointProbe::new(ApiClient::with_client(config, http.clone())?)
			.with_delay(delay);

		if i > 0 && !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		report.extend(probe.run([target.clone()]).await);
	}

	Ok(report)
}
