//! Environment-driven configuration surface: three identity-provider settings and the API base
//! URL. Domain and client id are required and their absence is a startup-blocking error whose
//! message carries the exact remediation instructions; the base URL falls back to the local
//! development default.

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable naming the identity-provider domain (e.g. `your-domain.auth0.com`).
pub const ENV_IDP_DOMAIN: &str = "AUTHZ_PROBE_IDP_DOMAIN";
/// Environment variable naming the identity-provider client identifier.
pub const ENV_IDP_CLIENT_ID: &str = "AUTHZ_PROBE_IDP_CLIENT_ID";
/// Environment variable naming the optional API audience identifier.
pub const ENV_IDP_AUDIENCE: &str = "AUTHZ_PROBE_IDP_AUDIENCE";
/// Environment variable naming the authorization API base URL.
pub const ENV_API_URL: &str = "AUTHZ_PROBE_API_URL";
/// Local development fallback used when [`ENV_API_URL`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Identity-provider settings consumed by the login delegation layer.
///
/// Only the pieces the probe actually needs are modeled; everything else about the provider's
/// protocol stays inside the `oauth2` crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdpSettings {
	/// Provider domain, without a scheme (e.g. `your-domain.auth0.com`).
	pub domain: String,
	/// OAuth 2.0 client identifier of the probe application.
	pub client_id: String,
	/// Optional API audience forwarded as the `audience` authorize parameter.
	pub audience: Option<String>,
}
impl IdpSettings {
	/// Creates settings for a provider domain and client identifier.
	pub fn new(domain: impl Into<String>, client_id: impl Into<String>) -> Self {
		Self { domain: domain.into(), client_id: client_id.into(), audience: None }
	}

	/// Sets or replaces the API audience.
	pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = Some(audience.into());

		self
	}

	/// Provider authorization endpoint (`https://{domain}/authorize`).
	pub fn authorize_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint("/authorize")
	}

	/// Provider token endpoint (`https://{domain}/oauth/token`).
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint("/oauth/token")
	}

	/// Provider logout endpoint (`https://{domain}/v2/logout`).
	pub fn logout_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint("/v2/logout")
	}

	fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		Url::parse(&format!("https://{}{path}", self.domain))
			.map_err(|source| ConfigError::InvalidIdpDomain { source })
	}
}

/// Complete probe configuration: identity-provider settings plus the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
	/// Identity-provider settings.
	pub idp: IdpSettings,
	/// Base URL of the authorization API; `/authorize` is joined onto it per check.
	pub api_base: Url,
}
impl ProbeConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the configuration from an arbitrary key/value source.
	///
	/// Blank values are treated as absent. Missing domain or client id is fatal and the returned
	/// error lists every variable that still needs to be set.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let domain = non_blank(lookup(ENV_IDP_DOMAIN));
		let client_id = non_blank(lookup(ENV_IDP_CLIENT_ID));
		let mut missing = Vec::new();

		if domain.is_none() {
			missing.push(ENV_IDP_DOMAIN);
		}
		if client_id.is_none() {
			missing.push(ENV_IDP_CLIENT_ID);
		}
		if !missing.is_empty() {
			return Err(ConfigError::MissingIdpSettings { missing });
		}

		// Both checked above.
		let mut idp = IdpSettings::new(domain.unwrap_or_default(), client_id.unwrap_or_default());

		if let Some(audience) = non_blank(lookup(ENV_IDP_AUDIENCE)) {
			idp = idp.with_audience(audience);
		}

		let api_base = non_blank(lookup(ENV_API_URL)).unwrap_or_else(|| DEFAULT_API_URL.into());
		let api_base =
			Url::parse(&api_base).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self { idp, api_base })
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|raw| raw.trim().to_owned()).filter(|trimmed| !trimmed.is_empty())
}
