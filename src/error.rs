//! Client-level error types shared across authentication, dispatch, and validation.
//!
//! Remote conditions (non-2xx statuses, transport failures) are deliberately *not* part of this
//! taxonomy by default—they are classified into [`RequestOutcome`](crate::request::RequestOutcome)
//! so ordinary callers get a usable boolean/absent result instead of exception-driven control
//! flow. Only caller misuse (preconditions, malformed annotations) and, when the
//! `surface_transport_errors` flag is set, transport failures surface as [`Error`].

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Annotation payload failed structural validation.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Transport failure surfaced because `surface_transport_errors` is enabled.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Precondition violation raised before any I/O is attempted.
	#[error("Invalid argument: {reason}")]
	InvalidArgument {
		/// Human-readable description of the violated precondition.
		reason: String,
	},
	/// The operation was cancelled before dispatch began.
	#[error("Operation was cancelled before dispatch.")]
	Cancelled,
}
impl Error {
	/// Builds an [`Error::InvalidArgument`] from any displayable reason.
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument { reason: reason.into() }
	}
}

/// Configuration and construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base instance URI cannot serve as a base for endpoint paths.
	#[error("Instance URI is invalid.")]
	InvalidInstanceUri {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A resource path did not produce a valid request URI.
	#[error("Request path `{path}` does not produce a valid URI.")]
	InvalidRequestPath {
		/// The offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Client id or client secret is empty.
	#[error("Client id and client secret must be non-empty.")]
	MissingClientCredentials,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Which bound of an annotation range failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeBound {
	/// The `start` element selector.
	Start,
	/// The `end` element selector.
	End,
}
impl RangeBound {
	/// Returns a stable label for error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			RangeBound::Start => "start",
			RangeBound::End => "end",
		}
	}
}
impl Display for RangeBound {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structural annotation failures, raised before any network dispatch.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// An annotation was submitted without a single range.
	#[error("An annotation requires at least one range.")]
	MissingRanges,
	/// A range bound does not match the `/tag[index]` selector form.
	#[error("Annotation range {bound} `{value}` does not match the `/tag[index]` form.")]
	MalformedBound {
		/// Which bound failed.
		bound: RangeBound,
		/// The rejected selector value.
		value: String,
	},
}

/// Transport-level failures (network, timeout, cancellation mid-flight).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The attempt exceeded the configured per-request timeout.
	#[error("Request exceeded the configured timeout.")]
	Timeout,
	/// The request was cancelled while in flight.
	#[error("Request was cancelled while in flight.")]
	Cancelled,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
