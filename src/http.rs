//! Transport primitives for authorization checks and the login code exchange.
//!
//! [`ProbeHttpClient`] is the probe's only dependency on an HTTP stack: implementations execute a
//! single JSON `POST` and hand back the raw status + body so the check layer can classify the
//! outcome itself (both `200` and `403` carry decisions, so transports must never treat statuses
//! as errors). The reqwest-backed default also exposes the [`AsyncHttpClient`] handle that the
//! `oauth2` crate consumes during the login code exchange.

// crates.io
use oauth2::http::StatusCode;
#[cfg(feature = "reqwest")]
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ProbeHttpClient`] implementations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing a single authorization check request.
///
/// Implementations must be `Send + Sync + 'static` so a probe can be shared across tasks without
/// wrappers. A transport performs exactly one attempt per call (no retry, timeout, or backoff) and
/// reports only genuine transport failures as errors; every received response, whatever its
/// status, is returned as a [`RawResponse`].
pub trait ProbeHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a `POST` with an `application/json` body against `endpoint`.
	fn post_json<'a>(&'a self, endpoint: &'a Url, body: Vec<u8>) -> HttpFuture<'a, RawResponse>;
}

/// Raw HTTP exchange result surfaced by transports before domain classification.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Whether the status carries an authorization decision (`200` = ALLOW path, `403` = DENY
	/// path); both are domain successes.
	pub fn is_decision(&self) -> bool {
		matches!(self.status, 200 | 403)
	}

	/// Synthesizes the `HTTP {status}: {status text}` line used when an error response carries no
	/// descriptor message.
	pub fn status_line(&self) -> String {
		let reason = StatusCode::from_u16(self.status)
			.ok()
			.and_then(|code| code.canonical_reason())
			.unwrap_or("Unknown Status");

		format!("HTTP {}: {reason}", self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The same client backs both check requests and the `oauth2` code exchange, so a custom
/// [`ReqwestClient`] only needs to be configured once.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the [`AsyncHttpClient`] handle consumed by the `oauth2` crate.
	pub fn oauth_handle(&self) -> OAuthHandle {
		OAuthHandle(Arc::new(self.0.clone()))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProbeHttpClient for ReqwestHttpClient {
	fn post_json<'a>(&'a self, endpoint: &'a Url, body: Vec<u8>) -> HttpFuture<'a, RawResponse> {
		Box::pin(async move {
			let response = self
				.0
				.post(endpoint.clone())
				.header(CONTENT_TYPE, "application/json")
				.body(body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}

#[cfg(feature = "reqwest")]
/// [`AsyncHttpClient`] adapter over reqwest, handed to the `oauth2` crate for the code exchange.
#[derive(Clone)]
pub struct OAuthHandle(Arc<ReqwestClient>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for OAuthHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
