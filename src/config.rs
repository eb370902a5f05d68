//! Client configuration: instance URI, OAuth client credentials, timeout, and error surfacing.

// self
use crate::{_prelude::*, error::ConfigError};

/// Fixed relative path of the OAuth token endpoint on every instance.
const TOKEN_ENDPOINT: &str = "oauth/v2/token";

/// Immutable configuration shared by the token manager and the request executor.
///
/// Resource endpoints follow the service's `api{path}.json` convention relative to the instance
/// URI; the token endpoint lives at the fixed `oauth/v2/token` path. Build instances through
/// [`ClientConfig::builder`].
#[derive(Clone)]
pub struct ClientConfig {
	base_url: Url,
	token_url: Url,
	client_id: String,
	client_secret: String,
	timeout: Option<Duration>,
	surface_transport_errors: bool,
}
impl ClientConfig {
	/// Returns a builder for the given instance URI and OAuth client credentials.
	pub fn builder(
		base_url: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder {
			base_url,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			timeout: None,
			surface_transport_errors: false,
		}
	}

	/// Normalized instance URI (always ends with a slash).
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Absolute URI of the token endpoint.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth client secret. Callers must avoid logging this string.
	pub fn client_secret(&self) -> &str {
		&self.client_secret
	}

	/// Per-attempt HTTP timeout, if configured.
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}

	/// Whether transport failures propagate as errors instead of degrading to default results.
	pub fn surface_transport_errors(&self) -> bool {
		self.surface_transport_errors
	}

	/// Resolves a resource path (e.g. `/entries/12`) to its absolute `api{path}.json` URI.
	pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = if path.starts_with('/') {
			format!("api{path}.json")
		} else {
			format!("api/{path}.json")
		};

		self.base_url
			.join(&relative)
			.map_err(|source| ConfigError::InvalidRequestPath { path: path.into(), source })
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("base_url", &self.base_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("timeout", &self.timeout)
			.field("surface_transport_errors", &self.surface_transport_errors)
			.finish()
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	client_id: String,
	client_secret: String,
	timeout: Option<Duration>,
	surface_transport_errors: bool,
}
impl ClientConfigBuilder {
	/// Bounds each individual HTTP attempt; a refresh call and its primary request each get their
	/// own budget.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Propagates transport failures (timeout, DNS, connection refused) to the caller instead of
	/// suppressing them into default/failure results.
	pub fn surface_transport_errors(mut self, surface: bool) -> Self {
		self.surface_transport_errors = surface;

		self
	}

	/// Validates the credentials and derives the token endpoint URI.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.client_id.is_empty() || self.client_secret.is_empty() {
			return Err(ConfigError::MissingClientCredentials);
		}

		let mut base_url = self.base_url;

		// A trailing slash keeps Url::join from dropping the last path segment.
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let token_url = base_url
			.join(TOKEN_ENDPOINT)
			.map_err(|source| ConfigError::InvalidInstanceUri { source })?;

		Ok(ClientConfig {
			base_url,
			token_url,
			client_id: self.client_id,
			client_secret: self.client_secret,
			timeout: self.timeout,
			surface_transport_errors: self.surface_transport_errors,
		})
	}
}
