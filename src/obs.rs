//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `readstash_api.call` with the `call` (kind)
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `readstash_api_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Initial `grant_type=password` token acquisition.
	PasswordGrant,
	/// `grant_type=refresh_token` rotation.
	RefreshGrant,
	/// Regular API resource call through the executor.
	Api,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::PasswordGrant => "password_grant",
			CallKind::RefreshGrant => "refresh_grant",
			CallKind::Api => "api",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller or classified as such.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs a response body that could not be decoded before it degrades to the default value.
pub(crate) fn record_decode_failure(err: &serde_path_to_error::Error<serde_json::Error>) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(
		path = %err.path(),
		error = %err.inner(),
		"Response body could not be decoded; falling back to the default value.",
	);
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}
