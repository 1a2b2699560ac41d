//! Probe-level error taxonomy shared across configuration, login, and check paths.
//!
//! ALLOW and DENY are never represented here: both are successful check outcomes. Errors cover
//! configuration problems (fatal at startup), authentication failures (retry by re-triggering
//! login), the missing-token precondition, non-decision HTTP responses, and transport failures.

// self
use crate::_prelude::*;

/// Probe-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical probe error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token acquisition failed; the user may retry by logging in again.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Check submitted without a token; rejected before any network call.
	#[error("No access token available. Please ensure you are logged in.")]
	MissingToken,
	/// Authorize endpoint answered with a non-decision status.
	#[error("Request failed: {message}")]
	Request {
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Error-descriptor message when the body carried one, else the synthesized status line.
		message: String,
	},
	/// Authorize endpoint returned a decision status with a malformed JSON body.
	#[error("Authorize endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code the body arrived with (200 or 403).
		status: u16,
	},
}

/// Configuration and validation failures raised by the probe.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required identity-provider settings are absent; fatal at startup.
	#[error(
		"Identity provider settings are missing: {}. Set the following environment variables and \
		 restart:\n  {}=your-domain.auth0.com\n  {}=your-client-id\n  {}=your-api-identifier",
		.missing.join(", "),
		crate::config::ENV_IDP_DOMAIN,
		crate::config::ENV_IDP_CLIENT_ID,
		crate::config::ENV_IDP_AUDIENCE
	)]
	MissingIdpSettings {
		/// Names of the environment variables that were unset or blank.
		missing: Vec<&'static str>,
	},
	/// Identity-provider domain does not form a valid HTTPS endpoint.
	#[error("Identity provider domain is invalid.")]
	InvalidIdpDomain {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL cannot be parsed or joined with `/authorize`.
	#[error("API base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Check request body could not be encoded.
	#[error("Unable to encode the authorization check request.")]
	RequestEncode(#[from] serde_json::Error),
}

/// Authentication failures surfaced after login was triggered.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Code exchange with the identity provider failed.
	#[error("Failed to get access token: {reason}")]
	TokenExchange {
		/// Provider- or probe-supplied reason string.
		reason: String,
	},
	/// Returned `state` did not match the login session.
	#[error("Login state mismatch; restart the login flow.")]
	StateMismatch,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config;

	#[test]
	fn missing_settings_message_carries_remediation() {
		let err = ConfigError::MissingIdpSettings {
			missing: vec![config::ENV_IDP_DOMAIN, config::ENV_IDP_CLIENT_ID],
		};
		let message = err.to_string();

		assert!(message.contains(config::ENV_IDP_DOMAIN));
		assert!(message.contains(config::ENV_IDP_CLIENT_ID));
		assert!(message.contains("your-domain.auth0.com"));
	}

	#[test]
	fn request_error_displays_composed_message() {
		let err = Error::Request { status: 500, message: "internal".into() };

		assert_eq!(err.to_string(), "Request failed: internal");
	}
}
