//! Opaque bearer-token wrapper that keeps credential material out of logs.

// self
use crate::_prelude::*;

const PREVIEW_EDGE_LEN: usize = 20;

/// Opaque bearer credential proving the caller's authenticated identity.
///
/// The probe never inspects the token; it is attached verbatim to authorization check requests.
/// `Debug` and `Display` redact the material; use [`expose`](Self::expose) for wire access and
/// [`preview`](Self::preview) for user-facing display.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the token is empty; empty tokens fail the check precondition.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Truncated `first 20…last 20` form for display; short tokens are shown whole.
	pub fn preview(&self) -> String {
		let chars: Vec<char> = self.0.chars().collect();

		if chars.len() <= 2 * PREVIEW_EDGE_LEN {
			return self.0.clone();
		}

		let head: String = chars[..PREVIEW_EDGE_LEN].iter().collect();
		let tail: String = chars[chars.len() - PREVIEW_EDGE_LEN..].iter().collect();

		format!("{head}...{tail}")
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
