//! Authorization check client: one `POST {base_url}/authorize` per submission, classified as a
//! tagged outcome.
//!
//! `Ok` carries an [`AuthorizationResponse`] whether the endpoint answered `200` (ALLOW path) or
//! `403` (DENY path); both are valid domain outcomes, never errors. Every other status maps to
//! [`Error::Request`], with the message taken from the body's error descriptor when present and
//! synthesized from the status line otherwise. Network failures, malformed decision bodies, and
//! the missing-token precondition surface as the remaining [`Error`] variants. The client
//! performs exactly one attempt per call: no retry, no timeout, no backoff, and no deduplication
//! of concurrent submissions.

pub mod model;

pub use model::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::ProbeHttpClient,
	obs::{self, OpKind, OpOutcome, OpSpan},
};
#[cfg(feature = "reqwest")]
use crate::{config::ProbeConfig, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Probe specialized for the crate's default reqwest transport.
pub type ReqwestProbe = AuthzProbe<ReqwestHttpClient>;

/// Authorization check client bound to a single `/authorize` endpoint.
///
/// The probe owns only the transport and the resolved endpoint; submissions carry their own
/// token, so one probe can serve any number of sessions.
#[derive(Clone)]
pub struct AuthzProbe<C>
where
	C: ?Sized + ProbeHttpClient,
{
	/// HTTP client used for every check request.
	pub http_client: Arc<C>,
	/// Fully-resolved `POST` target (`{base_url}/authorize`).
	pub authorize_endpoint: Url,
}
impl<C> AuthzProbe<C>
where
	C: ?Sized + ProbeHttpClient,
{
	/// Creates a probe that reuses the caller-provided transport.
	pub fn with_http_client(api_base: &Url, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let authorize_endpoint = api_base
			.join("/authorize")
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self { http_client: http_client.into(), authorize_endpoint })
	}

	/// Performs a single authorization check and classifies the outcome.
	///
	/// An empty token is rejected before any network call is attempted. The call is never
	/// retried, deduplicated, or cancelled; it runs to completion or failure.
	pub async fn check(&self, request: AuthorizationRequest) -> Result<AuthorizationResponse> {
		const KIND: OpKind = OpKind::Check;

		let span = OpSpan::new(KIND, "check");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.check_inner(request)).await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn check_inner(&self, request: AuthorizationRequest) -> Result<AuthorizationResponse> {
		if request.access_token.is_empty() {
			return Err(Error::MissingToken);
		}

		let body = serde_json::to_vec(&request).map_err(ConfigError::RequestEncode)?;
		let raw = self.http_client.post_json(&self.authorize_endpoint, body).await?;

		if raw.is_decision() {
			let mut deserializer = serde_json::Deserializer::from_slice(&raw.body);

			return serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| Error::ResponseParse { source, status: raw.status });
		}

		let message = serde_json::from_slice::<ErrorEnvelope>(&raw.body)
			.ok()
			.and_then(ErrorEnvelope::message)
			.unwrap_or_else(|| raw.status_line());

		Err(Error::Request { status: raw.status, message })
	}
}
#[cfg(feature = "reqwest")]
impl AuthzProbe<ReqwestHttpClient> {
	/// Creates a reqwest-backed probe for the configured API base URL.
	pub fn new(config: &ProbeConfig) -> Result<Self> {
		Self::from_base_url(&config.api_base)
	}

	/// Creates a reqwest-backed probe directly from a base URL.
	pub fn from_base_url(api_base: &Url) -> Result<Self> {
		Self::with_http_client(api_base, ReqwestHttpClient::default())
	}
}
impl<C> Debug for AuthzProbe<C>
where
	C: ?Sized + ProbeHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthzProbe")
			.field("authorize_endpoint", &self.authorize_endpoint.as_str())
			.finish()
	}
}
