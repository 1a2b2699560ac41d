//! Plain-text rendering of the tester panels: decision badge, reason, matched-permission rows,
//! raw response body, and the token preview.
//!
//! Decisions render identically whether they arrived via HTTP `200` or `403`; the badge is driven
//! purely by the `decision` field.

// self
use crate::{auth::BearerToken, check::AuthorizationResponse};

/// Placeholder shown while a submission is outstanding.
pub const PENDING_TEXT: &str = "Checking permissions...";
/// Placeholder shown before the first submission.
pub const EMPTY_TEXT: &str = "No results yet. Submit a request to test authorization.";
/// Placeholder shown while logged out.
pub const NO_TOKEN_TEXT: &str = "No access token available";

/// Renders the result panel for the current session state.
pub fn render_result_panel(result: Option<&AuthorizationResponse>, in_flight: bool) -> String {
	if in_flight {
		return PENDING_TEXT.into();
	}

	match result {
		Some(response) => render_decision(response),
		None => EMPTY_TEXT.into(),
	}
}

/// Renders a received decision: badge, user, reason, matched rows, raw body.
pub fn render_decision(result: &AuthorizationResponse) -> String {
	let mut out = String::new();

	out.push_str(result.decision.as_str());
	out.push('\n');
	out.push_str(&format!("User ID: {}\n", result.user_id));
	out.push_str(&format!("Reason: {}\n", result.reason));

	if !result.matched_permissions.is_empty() {
		out.push_str("Matched Permissions:\n");

		for permission in &result.matched_permissions {
			out.push_str(&format!(
				"  {} {} {}\n",
				permission.effect.as_str().to_uppercase(),
				permission.action,
				permission.resource,
			));
		}
	}

	// Re-serializing a value that was just deserialized cannot fail.
	let raw = serde_json::to_string_pretty(result).unwrap_or_default();

	out.push_str("Raw Response:\n");
	out.push_str(&raw);
	out.push('\n');

	out
}

/// Renders the token panel: truncated preview when logged in, placeholder otherwise.
pub fn render_token_panel(token: Option<&BearerToken>) -> String {
	match token {
		Some(token) if !token.is_empty() => token.preview(),
		_ => NO_TOKEN_TEXT.into(),
	}
}
