//! The single funnel every API call passes through.
//!
//! [`RequestExecutor::execute`] builds a request from a [`RequestDescriptor`], asks the token
//! manager for a valid bearer when required, encodes parameters per the service's wire format,
//! fires the pre/post-dispatch observers, and classifies the HTTP outcome into a
//! [`RequestOutcome`]. Remote failures never raise by default—callers inspect the outcome (or use
//! [`RequestExecutor::fetch`], which degrades every failure to the target type's default value).

pub mod params;

pub use params::{ParamValue, Params};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	config::ClientConfig,
	error::TransportError,
	events::{ObserverRegistry, RequestContext, ResponseSnapshot},
	http::{HttpTransport, Method, TransportRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Immutable description of one API call; created per call, discarded after dispatch.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
	/// HTTP verb.
	pub method: Method,
	/// Relative resource path (e.g. `/entries/12`), treated as an opaque template.
	pub target_path: String,
	/// Parameters, in insertion order.
	pub parameters: Params,
	/// Whether a bearer token must be attached before the transport is contacted.
	pub requires_auth: bool,
}
impl RequestDescriptor {
	/// Creates a descriptor with no parameters that requires authentication.
	pub fn new(method: Method, target_path: impl Into<String>) -> Self {
		Self { method, target_path: target_path.into(), parameters: Params::new(), requires_auth: true }
	}

	/// Replaces the parameter map.
	pub fn with_parameters(mut self, parameters: Params) -> Self {
		self.parameters = parameters;

		self
	}

	/// Marks the call as not requiring an access token.
	pub fn without_auth(mut self) -> Self {
		self.requires_auth = false;

		self
	}
}

/// Classification of one dispatch attempt.
#[derive(Debug)]
pub enum RequestOutcome {
	/// 2xx response; carries the exact status and the raw body.
	Success {
		/// The 2xx status code as received (200, 201, 204, ...).
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Non-2xx response; carries the status code.
	HttpFailure(u16),
	/// The transport failed before an HTTP status was available.
	TransportFailure(TransportError),
	/// Authentication was required but no usable access token could be obtained; the transport
	/// was never contacted.
	AuthUnavailable,
}
impl RequestOutcome {
	/// Returns `true` for [`RequestOutcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// HTTP status code, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Success { status, .. } => Some(*status),
			Self::HttpFailure(status) => Some(*status),
			_ => None,
		}
	}

	/// Deserializes a successful body into `T`; empty or unparseable bodies and every failure
	/// outcome yield `T::default()`.
	pub fn decode<T>(&self) -> T
	where
		T: DeserializeOwned + Default,
	{
		match self {
			Self::Success { body, .. } => decode_body(body),
			_ => T::default(),
		}
	}
}

/// Deserializes a response body, degrading empty or malformed payloads to the default value.
pub fn decode_body<T>(body: &str) -> T
where
	T: DeserializeOwned + Default,
{
	if body.trim().is_empty() {
		return T::default();
	}

	let deserializer = &mut serde_json::Deserializer::from_str(body);

	match serde_path_to_error::deserialize(deserializer) {
		Ok(value) => value,
		Err(err) => {
			obs::record_decode_failure(&err);

			T::default()
		},
	}
}

/// Builds, dispatches, and classifies every HTTP call issued by the client.
#[derive(Clone)]
pub struct RequestExecutor {
	config: Arc<ClientConfig>,
	transport: Arc<dyn HttpTransport>,
	tokens: Arc<TokenManager>,
	observers: Arc<ObserverRegistry>,
}
impl RequestExecutor {
	pub(crate) fn new(
		config: Arc<ClientConfig>,
		transport: Arc<dyn HttpTransport>,
		tokens: Arc<TokenManager>,
		observers: Arc<ObserverRegistry>,
	) -> Self {
		Self { config, transport, tokens, observers }
	}

	/// Executes one API call.
	///
	/// An already-cancelled token aborts before any hook fires or state mutates. Pre-dispatch
	/// observers fire next; if authentication is required and no usable token is available the
	/// call short-circuits to [`RequestOutcome::AuthUnavailable`] without contacting the
	/// transport (and without a post-dispatch hook). Otherwise the call is dispatched once,
	/// post-dispatch observers fire regardless of the result, and the outcome is classified.
	/// Transport failures return `Err` only when `surface_transport_errors` is enabled.
	pub async fn execute(
		&self,
		descriptor: &RequestDescriptor,
		cancel: &CancellationToken,
	) -> Result<RequestOutcome> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let span = CallSpan::new(CallKind::Api, "execute");

		obs::record_call_outcome(CallKind::Api, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(descriptor, cancel)).await;
		let outcome_label = match &result {
			Ok(outcome) if outcome.is_success() => CallOutcome::Success,
			_ => CallOutcome::Failure,
		};

		obs::record_call_outcome(CallKind::Api, outcome_label);

		result
	}

	/// Executes a call and decodes the outcome into `T`, degrading every failure to
	/// `T::default()`.
	pub async fn fetch<T>(
		&self,
		descriptor: &RequestDescriptor,
		cancel: &CancellationToken,
	) -> Result<T>
	where
		T: DeserializeOwned + Default,
	{
		Ok(self.execute(descriptor, cancel).await?.decode())
	}

	async fn dispatch(
		&self,
		descriptor: &RequestDescriptor,
		cancel: &CancellationToken,
	) -> Result<RequestOutcome> {
		let context = RequestContext {
			method: descriptor.method,
			target_path: descriptor.target_path.clone(),
			parameters: descriptor.parameters.clone(),
		};

		self.observers.notify_before(&context);

		let mut bearer = None;

		if descriptor.requires_auth {
			match self.tokens.bearer_for_dispatch(cancel).await {
				Some(token) => bearer = Some(token.expose().to_string()),
				None => return Ok(RequestOutcome::AuthUnavailable),
			}
		}

		let mut url = self.config.api_url(&descriptor.target_path)?;
		let mut body = None;

		if descriptor.method.is_get() {
			if !descriptor.parameters.is_empty() {
				url.set_query(Some(&descriptor.parameters.query_string()));
			}
		} else if !descriptor.parameters.is_empty() {
			body = Some(descriptor.parameters.json_body().to_string());
		}

		let request = TransportRequest { method: descriptor.method, url, bearer, body };
		// Cancellation mid-flight degrades to a transport failure; the post-dispatch hook still
		// fires for the attempt.
		let result = match cancel.run_until_cancelled(self.transport.send(request)).await {
			Some(result) => result,
			None => Err(TransportError::Cancelled),
		};

		match result {
			Ok(response) => {
				self.observers.notify_after(&context, Some(&ResponseSnapshot::from(&response)));

				if response.is_success() {
					Ok(RequestOutcome::Success {
						status: response.status,
						body: response.body,
					})
				} else {
					Ok(RequestOutcome::HttpFailure(response.status))
				}
			},
			Err(err) => {
				self.observers.notify_after(&context, None);

				if self.config.surface_transport_errors() {
					Err(Error::Transport(err))
				} else {
					Ok(RequestOutcome::TransportFailure(err))
				}
			},
		}
	}
}
impl Debug for RequestExecutor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor").field("config", &self.config).finish()
	}
}
