//! Caller-owned tester state: the current token, the single live result, and the error banner.
//!
//! State flows one way: submissions produce immutable [`AuthorizationResponse`] values that
//! replace the previous one wholesale. Nothing here orders overlapping submissions: the result
//! slot is last-writer-wins and the in-flight flag is advisory only (callers disable their
//! trigger while it is raised, but a second call is not prevented).

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	check::{AuthorizationRequest, AuthorizationResponse, AuthzProbe, HttpMethod},
	http::ProbeHttpClient,
};

/// Thread-safe slot for the single live [`AuthorizationResponse`].
///
/// Exactly one response is live at a time; storing replaces the previous value wholesale.
#[derive(Debug, Default)]
pub struct ResultSlot(Mutex<Option<AuthorizationResponse>>);
impl ResultSlot {
	/// Replaces the live response.
	pub fn store(&self, response: AuthorizationResponse) {
		*self.0.lock() = Some(response);
	}

	/// Returns the live response, if any, consuming it from the slot.
	pub fn take(&self) -> Option<AuthorizationResponse> {
		self.0.lock().take()
	}

	/// Returns a copy of the live response without consuming it.
	pub fn snapshot(&self) -> Option<AuthorizationResponse> {
		self.0.lock().clone()
	}
}

/// Orchestrating state for one tester: token, live result, error banner, advisory flag.
#[derive(Debug, Default)]
pub struct TesterSession {
	token: Mutex<Option<BearerToken>>,
	result: ResultSlot,
	error: Mutex<Option<String>>,
	in_flight: AtomicBool,
}
impl TesterSession {
	/// Creates an empty session (no token, no result).
	pub fn new() -> Self {
		Self::default()
	}

	/// Adopts the token obtained from the identity provider after login.
	pub fn adopt_token(&self, token: BearerToken) {
		*self.token.lock() = Some(token);
	}

	/// Returns the current token, if logged in.
	pub fn token(&self) -> Option<BearerToken> {
		self.token.lock().clone()
	}

	/// Returns the live result, if any.
	pub fn result(&self) -> Option<AuthorizationResponse> {
		self.result.snapshot()
	}

	/// Returns the latest error banner text, if any.
	pub fn error(&self) -> Option<String> {
		self.error.lock().clone()
	}

	/// Whether a submission is currently outstanding. Advisory only.
	pub fn is_in_flight(&self) -> bool {
		self.in_flight.load(Ordering::SeqCst)
	}

	/// Clears token, live result, and error banner. The provider-side logout trigger is built
	/// separately via [`IdentityBroker::logout_url`](crate::idp::IdentityBroker::logout_url).
	pub fn logout(&self) {
		*self.token.lock() = None;
		*self.error.lock() = None;

		self.result.take();
	}

	/// Submits one authorization check through `probe` and records the outcome.
	///
	/// Clears the banner, raises the advisory flag, performs exactly one check, then stores the
	/// decision (success) or the banner text (failure; the previous decision stays displayed).
	/// Submitting without a token short-circuits before any network call.
	pub async fn submit<C>(
		&self,
		probe: &AuthzProbe<C>,
		method: HttpMethod,
		path: &str,
	) -> Result<AuthorizationResponse>
	where
		C: ?Sized + ProbeHttpClient,
	{
		*self.error.lock() = None;

		let Some(token) = self.token() else {
			let err = Error::MissingToken;

			*self.error.lock() = Some(err.to_string());

			return Err(err);
		};

		self.in_flight.store(true, Ordering::SeqCst);

		let outcome = probe.check(AuthorizationRequest::new(token, method, path)).await;

		self.in_flight.store(false, Ordering::SeqCst);

		match &outcome {
			Ok(response) => self.result.store(response.clone()),
			Err(err) => *self.error.lock() = Some(err.to_string()),
		}

		outcome
	}
}
