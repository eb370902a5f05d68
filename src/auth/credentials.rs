//! Mutable credential state and the redacted token secret wrapper.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` for zero-length secrets.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Mutable OAuth credential state, owned exclusively by the client.
///
/// `last_refresh_at` is a wall-clock instant used only for staleness decisions; the core never
/// persists it. Tokens older than [`Credentials::TOKEN_TTL`] are considered stale and trigger a
/// lazy refresh on the next authenticated call.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
	/// Current access token, if one has been acquired.
	pub access_token: Option<TokenSecret>,
	/// Current refresh token, if the server issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Instant of the last successful acquisition or refresh.
	pub last_refresh_at: Option<OffsetDateTime>,
}
impl Credentials {
	/// Access tokens are treated as stale once they are older than this.
	pub const TOKEN_TTL: Duration = Duration::seconds(3600);

	/// Returns `true` when a non-empty access token is present.
	pub fn has_access_token(&self) -> bool {
		self.access_token.as_ref().is_some_and(|token| !token.is_empty())
	}

	/// Returns `true` when a non-empty refresh token is present.
	pub fn has_refresh_token(&self) -> bool {
		self.refresh_token.as_ref().is_some_and(|token| !token.is_empty())
	}

	/// Returns `true` when the access token is stale at `instant` (or was never acquired).
	pub fn is_stale_at(&self, instant: OffsetDateTime) -> bool {
		match self.last_refresh_at {
			Some(at) => instant - at > Self::TOKEN_TTL,
			None => true,
		}
	}

	/// Stores a freshly granted token pair and stamps the refresh instant.
	pub(crate) fn store_grant(
		&mut self,
		access_token: TokenSecret,
		refresh_token: TokenSecret,
		instant: OffsetDateTime,
	) {
		self.access_token = Some(access_token);
		self.refresh_token = Some(refresh_token);
		self.last_refresh_at = Some(instant);
	}
}
