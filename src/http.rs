//! Transport primitives for API and token-endpoint dispatch.
//!
//! The module exposes [`HttpTransport`] so downstream crates can integrate custom HTTP stacks
//! without losing the executor's classification and hook behavior. The default
//! [`ReqwestTransport`] (behind the `reqwest` feature) maps reqwest timeouts onto
//! [`TransportError::Timeout`] and everything else onto [`TransportError::Network`].

// crates.io
use async_trait::async_trait;
#[cfg(feature = "reqwest")]
use reqwest::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP verbs supported by the service, mapped verbatim to their wire names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the verb name exactly as it appears on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	/// `GET` requests carry parameters in the query string instead of a body.
	pub const fn is_get(self) -> bool {
		matches!(self, Method::Get)
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A single outbound HTTP attempt, fully assembled by the caller.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute request URI, query string included.
	pub url: Url,
	/// Bearer token to attach as the `Authorization` header, if any.
	pub bearer: Option<String>,
	/// JSON body, if any. Implementations must send it as `application/json`.
	pub body: Option<String>,
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body, decoded as text.
	pub body: String,
}
impl TransportResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP stacks capable of executing a single request/response exchange.
///
/// This trait is the crate's only dependency on an HTTP implementation. A transport performs
/// exactly one attempt per call—retries, caching, and coalescing are out of scope. Any response
/// that carries an HTTP status (2xx or not) is `Ok`; `Err` is reserved for transport-level
/// failures such as timeouts or connection errors.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
	/// Executes one HTTP attempt.
	async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Every request advertises `Accept: application/json`; bodies go out as `application/json`,
/// matching the service's wire format.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with an optional per-attempt timeout.
	pub fn new(timeout: Option<Duration>) -> Result<Self, crate::error::ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout.unsigned_abs());
		}

		Ok(Self(builder.build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		};
		let mut builder =
			self.0.request(method, request.url).header(ACCEPT, "application/json");

		if let Some(bearer) = request.bearer {
			builder = builder.bearer_auth(bearer);
		}
		if let Some(body) = request.body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(body);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(TransportResponse { status, body })
	}
}
