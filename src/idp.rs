//! Identity-provider delegation: login redirect, code exchange, logout trigger.
//!
//! The authorization-code + PKCE protocol itself lives entirely inside the `oauth2` crate; this
//! module only wires the configured provider settings into it and hands back the opaque
//! [`BearerToken`] the check client consumes. Endpoints are Auth0-shaped
//! (`https://{domain}/authorize`, `https://{domain}/oauth/token`, `https://{domain}/v2/logout`).
//! There is no token renewal, storage, or rotation; an expired token simply makes subsequent
//! checks fail and the user logs in again.

// std
use std::borrow::Cow;
// crates.io
#[cfg(feature = "reqwest")]
use oauth2::{
	AuthorizationCode, HttpClientError, PkceCodeVerifier, RequestTokenError, TokenResponse,
	basic::BasicRequestTokenError,
};
use oauth2::{
	AuthUrl, ClientId, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge, RedirectUrl,
	Scope, TokenUrl, basic::BasicClient,
};
// self
#[cfg(feature = "reqwest")]
use crate::{
	auth::BearerToken,
	http::ReqwestHttpClient,
	obs::{self, OpKind, OpOutcome, OpSpan},
};
use crate::{
	_prelude::*,
	config::IdpSettings,
	error::{AuthError, ConfigError},
};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// Scopes requested at login, matching the identity the check service resolves tokens against.
const LOGIN_SCOPES: [&str; 3] = ["openid", "profile", "email"];

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Login/logout delegation bound to one identity provider.
///
/// The broker is a public client (no secret); possession is proven via PKCE, which the `oauth2`
/// crate generates and verifies.
#[derive(Clone)]
pub struct IdentityBroker {
	oauth_client: ConfiguredBasicClient,
	settings: IdpSettings,
}
impl IdentityBroker {
	/// Creates a broker for the provided identity-provider settings.
	pub fn new(settings: IdpSettings) -> Result<Self> {
		let auth_url = AuthUrl::new(settings.authorize_endpoint()?.to_string())
			.map_err(|source| ConfigError::InvalidIdpDomain { source })?;
		let token_url = TokenUrl::new(settings.token_endpoint()?.to_string())
			.map_err(|source| ConfigError::InvalidIdpDomain { source })?;
		let oauth_client = BasicClient::new(ClientId::new(settings.client_id.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		Ok(Self { oauth_client, settings })
	}

	/// Starts a login: returns the session whose authorize URL the user should be sent to.
	///
	/// The session carries the PKCE verifier privately; keep it until the redirect returns and
	/// pass it to [`exchange_code`](Self::exchange_code).
	pub fn start_login(&self, redirect_uri: Url) -> Result<LoginSession> {
		let redirect_url = RedirectUrl::new(redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
		let mut request = self
			.oauth_client
			.authorize_url(CsrfToken::new_random)
			.set_redirect_uri(Cow::Owned(redirect_url))
			.set_pkce_challenge(challenge);

		for scope in LOGIN_SCOPES {
			request = request.add_scope(Scope::new(scope.to_owned()));
		}
		if let Some(audience) = &self.settings.audience {
			request = request.add_extra_param("audience", audience.as_str());
		}

		let (authorize_url, state) = request.url();

		Ok(LoginSession {
			authorize_url,
			state: state.secret().to_owned(),
			redirect_uri,
			verifier: verifier.secret().to_owned(),
		})
	}

	/// Exchanges the authorization code returned by the redirect for a bearer token.
	///
	/// A single attempt; failures surface as [`AuthError`] and the user may retry by
	/// re-triggering login.
	#[cfg(feature = "reqwest")]
	pub async fn exchange_code(
		&self,
		http_client: &ReqwestHttpClient,
		session: LoginSession,
		code: &str,
	) -> Result<BearerToken> {
		const KIND: OpKind = OpKind::TokenExchange;

		let span = OpSpan::new(KIND, "exchange_code");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.exchange_inner(http_client, session, code)).await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	#[cfg(feature = "reqwest")]
	async fn exchange_inner(
		&self,
		http_client: &ReqwestHttpClient,
		session: LoginSession,
		code: &str,
	) -> Result<BearerToken> {
		let (redirect_uri, verifier) = session.into_exchange_parts();
		let redirect_url = RedirectUrl::new(redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let request = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.set_pkce_verifier(PkceCodeVerifier::new(verifier))
			.set_redirect_uri(Cow::Owned(redirect_url));
		let handle = http_client.oauth_handle();
		let response = request.request_async(&handle).await.map_err(map_exchange_error)?;

		Ok(BearerToken::new(response.access_token().secret().to_owned()))
	}

	/// Builds the provider logout trigger for the given return URL.
	pub fn logout_url(&self, return_to: &Url) -> Result<Url> {
		let mut url = self.settings.logout_endpoint()?;

		url.query_pairs_mut()
			.append_pair("client_id", &self.settings.client_id)
			.append_pair("returnTo", return_to.as_str());

		Ok(url)
	}
}
impl Debug for IdentityBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityBroker").field("settings", &self.settings).finish()
	}
}

/// Login handshake state returned by [`IdentityBroker::start_login`].
#[derive(Clone)]
pub struct LoginSession {
	/// Fully-formed authorize URL the user should be sent to.
	pub authorize_url: Url,
	/// Opaque state value that must round-trip via the redirect.
	pub state: String,
	/// Redirect URI supplied when constructing the authorize URL.
	pub redirect_uri: Url,
	verifier: String,
}
impl LoginSession {
	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(AuthError::StateMismatch.into()) }
	}

	#[cfg(feature = "reqwest")]
	fn into_exchange_parts(self) -> (Url, String) {
		let LoginSession { redirect_uri, verifier, .. } = self;

		(redirect_uri, verifier)
	}
}
impl Debug for LoginSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginSession")
			.field("authorize_url", &self.authorize_url.as_str())
			.field("state", &self.state)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("verifier", &"<redacted>")
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn map_exchange_error(err: BasicRequestTokenError<HttpClientError<ReqwestError>>) -> Error {
	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = response
				.error_description()
				.cloned()
				.unwrap_or_else(|| response.error().as_ref().to_owned());

			AuthError::TokenExchange { reason }.into()
		},
		RequestTokenError::Request(HttpClientError::Io(inner)) => TransportError::Io(inner).into(),
		RequestTokenError::Request(HttpClientError::Reqwest(inner)) =>
			TransportError::from(*inner).into(),
		RequestTokenError::Request(_) => AuthError::TokenExchange {
			reason: "HTTP client error occurred during the code exchange.".into(),
		}
		.into(),
		RequestTokenError::Parse(source, _body) => AuthError::TokenExchange {
			reason: format!("Token endpoint returned malformed JSON: {source}."),
		}
		.into(),
		RequestTokenError::Other(message) =>
			AuthError::TokenExchange { reason: message }.into(),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn broker() -> IdentityBroker {
		let settings = IdpSettings::new("tenant.auth0.com", "client-abc")
			.with_audience("https://api.example.com");

		IdentityBroker::new(settings).expect("Broker should build from valid settings.")
	}

	fn redirect() -> Url {
		Url::parse("http://localhost:5173/callback").expect("Redirect URI should parse.")
	}

	#[test]
	fn authorize_url_carries_the_delegated_parameters() {
		let session =
			broker().start_login(redirect()).expect("Login session should start.");

		assert_eq!(session.authorize_url.host_str(), Some("tenant.auth0.com"));
		assert_eq!(session.authorize_url.path(), "/authorize");

		let pairs: HashMap<_, _> = session.authorize_url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("client_id"), Some(&"client-abc".into()));
		assert_eq!(pairs.get("redirect_uri"), Some(&redirect().to_string()));
		assert_eq!(pairs.get("scope"), Some(&"openid profile email".into()));
		assert_eq!(pairs.get("audience"), Some(&"https://api.example.com".into()));
		assert_eq!(pairs.get("code_challenge_method"), Some(&"S256".into()));
		assert!(pairs.contains_key("code_challenge"));
		assert_eq!(pairs.get("state"), Some(&session.state));
		assert!(!session.state.is_empty());
	}

	#[test]
	fn audience_is_omitted_when_unset() {
		let settings = IdpSettings::new("tenant.auth0.com", "client-abc");
		let broker =
			IdentityBroker::new(settings).expect("Broker should build without an audience.");
		let session = broker.start_login(redirect()).expect("Login session should start.");
		let pairs: HashMap<_, _> = session.authorize_url.query_pairs().into_owned().collect();

		assert!(!pairs.contains_key("audience"));
	}

	#[test]
	fn state_validation_round_trips() {
		let session = broker().start_login(redirect()).expect("Login session should start.");

		assert!(session.validate_state(&session.state).is_ok());
		assert!(matches!(
			session.validate_state("tampered"),
			Err(Error::Auth(AuthError::StateMismatch))
		));
	}

	#[test]
	fn logout_url_carries_client_id_and_return_target() {
		let return_to = Url::parse("http://localhost:5173/").expect("Return URL should parse.");
		let url = broker().logout_url(&return_to).expect("Logout URL should build.");

		assert_eq!(url.host_str(), Some("tenant.auth0.com"));
		assert_eq!(url.path(), "/v2/logout");

		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("client_id"), Some(&"client-abc".into()));
		assert_eq!(pairs.get("returnTo"), Some(&return_to.to_string()));
	}

	#[test]
	fn session_debug_redacts_the_verifier() {
		let session = broker().start_login(redirect()).expect("Login session should start.");
		let rendered = format!("{session:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains(&session.verifier));
	}
}
