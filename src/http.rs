//! Signed HTTP dispatch against the target API.
//!
//! [`ApiClient`] signs every request with a fresh timestamp + nonce, applies the configured
//! timeout, and classifies the outcome. [`ApiClient::execute`] returns the raw
//! [`ApiResponse`] for any HTTP status; [`ApiClient::send`] maps non-success statuses into
//! [`Error`] variants. Neither retries: a timeout means the remote outcome is unknown, and
//! blindly re-sending with a fresh nonce can apply a non-idempotent operation twice.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::{Method, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::{
	config::ClientConfig,
	error::{ConfigError, TransportError},
	obs::{self, OpKind, OpSpan},
	signing::{RequestError, RequestSigner, SignedRequest, request},
};

/// Raw response returned by the remote API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body as text.
	pub body: String,
}
impl ApiResponse {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Deserializes the body, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::ResponseParse { source, status: self.status })
	}

	/// Maps the response into the error taxonomy; success statuses pass through.
	pub fn classify(self, method: &str, path: &str) -> Result<Self> {
		match self.status {
			200..=299 => Ok(self),
			401 | 403 => Err(Error::AuthenticationRejected { status: self.status, body: self.body }),
			404 => Err(Error::UnknownEndpoint {
				method: method.to_owned(),
				path: path.to_owned(),
				status: self.status,
				body: self.body,
			}),
			status => Err(Error::UnexpectedStatus { status, body: self.body }),
		}
	}
}

/// HTTP client that signs every outbound request.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ApiClient {
	http: ReqwestClient,
	signer: RequestSigner,
	base_url: Url,
	timeout: std::time::Duration,
}
#[cfg(feature = "reqwest")]
impl ApiClient {
	/// Builds a client with its own reqwest transport.
	///
	/// Redirects are disabled: a redirected request would arrive with a signature bound to the
	/// original path.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Self::with_client(config, http)
	}

	/// Builds a client around an existing reqwest [`ReqwestClient`].
	pub fn with_client(config: ClientConfig, http: ReqwestClient) -> Result<Self> {
		let timeout = std::time::Duration::try_from(config.timeout)
			.ok()
			.filter(|timeout| !timeout.is_zero())
			.ok_or(ConfigError::InvalidTimeout)?;
		let signer = RequestSigner::new(config.signer_config())?;

		Ok(Self { http, signer, base_url: config.base_url, timeout })
	}

	/// Returns the signer used for outbound requests.
	pub fn signer(&self) -> &RequestSigner {
		&self.signer
	}

	/// Resolves `path` against the base URL; the resulting URL path is what gets signed.
	pub fn resolve(&self, path: &str) -> Result<Url, RequestError> {
		request::validate_path(path)?;

		let mut url = self.base_url.clone();
		let joined = format!("{}{path}", self.base_url.path().trim_end_matches('/'));

		url.set_path(&joined);

		Ok(url)
	}

	/// Sends a signed `GET` and classifies the response.
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.send(Method::GET, path, None).await
	}

	/// Serializes `body` as JSON, sends a signed `POST`, and classifies the response.
	pub async fn post_json<T>(&self, path: &str, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		let payload =
			serde_json::to_string(body).map_err(|source| ConfigError::InvalidBody { source })?;

		self.send(Method::POST, path, Some(payload)).await
	}

	/// Sends a signed request and classifies the response.
	pub async fn send(
		&self,
		method: Method,
		path: &str,
		body: Option<String>,
	) -> Result<ApiResponse> {
		let method_label = method.as_str().to_owned();
		let signed_path = self.resolve(path)?.path().to_owned();

		self.execute(method, path, body).await?.classify(&method_label, &signed_path)
	}

	/// Sends a signed request and returns the raw response for any HTTP status.
	pub async fn execute(
		&self,
		method: Method,
		path: &str,
		body: Option<String>,
	) -> Result<ApiResponse> {
		let span = OpSpan::start(OpKind::Dispatch, "execute");
		let result = span.instrument(self.dispatch(method, path, body)).await;

		span.finish(&result);

		result
	}

	async fn dispatch(
		&self,
		method: Method,
		path: &str,
		body: Option<String>,
	) -> Result<ApiResponse> {
		let url = self.resolve(path)?;
		let mut request = SignedRequest::new(method.as_str(), url.path())?;

		if let Some(payload) = &body {
			request = request.with_body(payload.as_str());
		}

		let headers = self.signer.auth_headers(&request)?.to_header_map()?;

		obs::op_debug!(method = %method, url = %url, "dispatching signed request");

		let mut builder = self.http.request(method, url).timeout(self.timeout).headers(headers);

		if let Some(payload) = body.filter(|payload| !payload.is_empty()) {
			builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
		}

		let response = builder.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(TransportError::from)?;

		obs::op_debug!(status, "received response");

		Ok(ApiResponse { status, body })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> ApiResponse {
		ApiResponse { status, body: body.to_owned() }
	}

	#[test]
	fn classify_maps_statuses_into_the_taxonomy() {
		assert!(response(201, "{}").classify("POST", "/wallets").is_ok());
		assert!(matches!(
			response(401, "bad signature").classify("GET", "/wallets"),
			Err(Error::AuthenticationRejected { status: 401, .. })
		));
		assert!(matches!(
			response(403, "").classify("GET", "/wallets"),
			Err(Error::AuthenticationRejected { status: 403, .. })
		));
		assert!(matches!(
			response(404, "").classify("GET", "/cards"),
			Err(Error::UnknownEndpoint { status: 404, ref path, .. }) if path == "/cards"
		));
		assert!(matches!(
			response(502, "upstream").classify("GET", "/wallets"),
			Err(Error::UnexpectedStatus { status: 502, ref body }) if body == "upstream"
		));
	}

	#[test]
	fn json_reports_the_failing_path() {
		#[allow(dead_code)]
		#[derive(Debug, Deserialize)]
		struct Wallet {
			balance: u64,
		}
		#[allow(dead_code)]
		#[derive(Debug, Deserialize)]
		struct Envelope {
			data: Wallet,
		}

		let err = response(200, "{\"data\":{\"balance\":\"lots\"}}")
			.json::<Envelope>()
			.expect_err("String balance should not deserialize.");

		match err {
			Error::ResponseParse { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "data.balance");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
