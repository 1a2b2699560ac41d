//! Wire types of the authorization check contract.
//!
//! Field names and casing are bit-relevant: requests serialize to
//! `{"access_token": ..., "method": ..., "path": ...}` and decision bodies deserialize from
//! `{"decision": "ALLOW"|"DENY", "user_id": ..., "reason": ..., "matched_permissions": [...]}`.

// self
use crate::{_prelude::*, auth::BearerToken};

/// HTTP methods accepted by the authorization check form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	#[default]
	/// Read access.
	Get,
	/// Write access (create).
	Post,
	/// Write access (replace).
	Put,
	/// Write access (modify).
	Patch,
	/// Delete access.
	Delete,
}
impl HttpMethod {
	/// All methods, in form order.
	pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

	/// Returns the uppercase wire form.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = UnknownHttpMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		HttpMethod::ALL
			.into_iter()
			.find(|method| method.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownHttpMethod(s.to_owned()))
	}
}

/// Error returned when parsing an unsupported HTTP method name.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown HTTP method `{0}`; expected one of GET, POST, PUT, PATCH, DELETE.")]
pub struct UnknownHttpMethod(pub String);

/// Authorization check request, constructed fresh per submission and never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct AuthorizationRequest {
	/// Opaque bearer credential; serialized verbatim into the body.
	pub access_token: BearerToken,
	/// HTTP method being exercised.
	pub method: HttpMethod,
	/// Slash-delimited resource locator, possibly containing identifiers.
	pub path: String,
}
impl AuthorizationRequest {
	/// Builds a request for a token/method/path triple.
	pub fn new(access_token: BearerToken, method: HttpMethod, path: impl Into<String>) -> Self {
		Self { access_token, method, path: path.into() }
	}
}

/// Binary outcome of an authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
	/// The caller may perform the request.
	Allow,
	/// The caller may not perform the request.
	Deny,
}
impl Decision {
	/// Returns the uppercase badge label (also the wire form).
	pub const fn as_str(self) -> &'static str {
		match self {
			Decision::Allow => "ALLOW",
			Decision::Deny => "DENY",
		}
	}

	/// Whether the decision permits the request.
	pub const fn is_allow(self) -> bool {
		matches!(self, Decision::Allow)
	}
}
impl Display for Decision {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Effect of a single policy rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
	/// The rule grants access.
	Allow,
	/// The rule denies access.
	Deny,
}
impl Effect {
	/// Returns the lowercase wire form.
	pub const fn as_str(self) -> &'static str {
		match self {
			Effect::Allow => "allow",
			Effect::Deny => "deny",
		}
	}
}
impl Display for Effect {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Policy rule cited by the authorization service as contributing to the decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatch {
	/// Action the rule covers.
	pub action: String,
	/// Resource pattern or exact locator the rule matched.
	pub resource: String,
	/// Whether the rule allows or denies.
	pub effect: Effect,
}

/// Authorization decision surfaced verbatim from a `200` or `403` response.
///
/// Immutable once received; held only for display until superseded by the next submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
	/// Binary decision.
	pub decision: Decision,
	/// Identity the service resolved from the token.
	pub user_id: String,
	/// Human-readable explanation of the decision.
	pub reason: String,
	/// Policy rules that produced the decision, in service order.
	pub matched_permissions: Vec<PermissionMatch>,
}

/// Lenient error envelope carried by non-decision responses: `{"error": {"message": ...}}`,
/// every field optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
	/// Error descriptor, when present.
	#[serde(default)]
	pub error: Option<ErrorDescriptor>,
}
impl ErrorEnvelope {
	/// Extracts the descriptor message, if any.
	pub fn message(self) -> Option<String> {
		self.error.and_then(|descriptor| descriptor.message)
	}
}

/// Inner error descriptor of an [`ErrorEnvelope`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorDescriptor {
	/// Human-readable failure message.
	#[serde(default)]
	pub message: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_serializes_with_wire_field_names() {
		let request = AuthorizationRequest::new(
			BearerToken::new("abc"),
			HttpMethod::Get,
			"/transactions",
		);
		let value = serde_json::to_value(&request).expect("Request should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"access_token": "abc",
				"method": "GET",
				"path": "/transactions",
			})
		);
	}

	#[test]
	fn decision_body_round_trips() {
		let body = r#"{
			"decision": "ALLOW",
			"user_id": "u1",
			"reason": "owner",
			"matched_permissions": [
				{ "action": "read", "resource": "/transactions", "effect": "allow" }
			]
		}"#;
		let response: AuthorizationResponse =
			serde_json::from_str(body).expect("Decision body should deserialize.");

		assert_eq!(response.decision, Decision::Allow);
		assert!(response.decision.is_allow());
		assert_eq!(response.matched_permissions.len(), 1);
		assert_eq!(response.matched_permissions[0].effect, Effect::Allow);
	}

	#[test]
	fn decision_rejects_unknown_labels() {
		assert!(serde_json::from_str::<Decision>("\"MAYBE\"").is_err());
		assert!(serde_json::from_str::<Decision>("\"allow\"").is_err());
		assert!(serde_json::from_str::<Effect>("\"ALLOW\"").is_err());
	}

	#[test]
	fn method_parsing_is_case_insensitive() {
		assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
		assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
		assert!("HEAD".parse::<HttpMethod>().is_err());
	}

	#[test]
	fn error_envelope_tolerates_missing_fields() {
		let with_message: ErrorEnvelope =
			serde_json::from_str(r#"{"error":{"message":"internal"}}"#)
				.expect("Envelope should deserialize.");
		let without_descriptor: ErrorEnvelope =
			serde_json::from_str("{}").expect("Empty envelope should deserialize.");
		let without_message: ErrorEnvelope = serde_json::from_str(r#"{"error":{}}"#)
			.expect("Descriptor without message should deserialize.");

		assert_eq!(with_message.message(), Some("internal".into()));
		assert_eq!(without_descriptor.message(), None);
		assert_eq!(without_message.message(), None);
	}
}
