//! High-level client facade and thin endpoint wrappers.

pub mod annotations;
pub mod entries;
pub mod tags;

pub use entries::{DateOrder, EntryFilter, NewEntry, SortDirection};

// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	config::ClientConfig,
	events::{ObserverRegistry, RequestObserver},
	http::{HttpTransport, Method},
	request::{RequestDescriptor, RequestExecutor},
};
#[cfg(feature = "reqwest")]
use crate::http::ReqwestTransport;

/// Client for one service instance.
///
/// The client owns the configuration, the token manager, the observer registry, and the request
/// executor; every endpoint wrapper is a one-line mapping onto
/// [`RequestExecutor::execute`]/[`fetch`](RequestExecutor::fetch) plus its documented
/// precondition checks.
pub struct Client {
	config: Arc<ClientConfig>,
	executor: RequestExecutor,
	tokens: Arc<TokenManager>,
	observers: Arc<ObserverRegistry>,
	// Cached server version; fetched lazily, refreshed on demand.
	version: Mutex<Option<String>>,
}
impl Client {
	/// Creates a client backed by the crate's default reqwest transport, honoring the
	/// configuration's per-attempt timeout.
	#[cfg(feature = "reqwest")]
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = Arc::new(ReqwestTransport::new(config.timeout())?);

		Ok(Self::with_transport(config, transport))
	}

	/// Creates a client that reuses a caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
		let config = Arc::new(config);
		let observers = Arc::new(ObserverRegistry::default());
		let tokens =
			Arc::new(TokenManager::new(config.clone(), transport.clone(), observers.clone()));
		let executor =
			RequestExecutor::new(config.clone(), transport, tokens.clone(), observers.clone());

		Self { config, executor, tokens, observers, version: Mutex::new(None) }
	}

	/// Shared client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token lifecycle manager; exposes acquisition, refresh, and persistence hooks.
	pub fn tokens(&self) -> &TokenManager {
		&self.tokens
	}

	/// The request executor, for callers issuing endpoints this crate does not wrap.
	pub fn executor(&self) -> &RequestExecutor {
		&self.executor
	}

	/// Registers a request/credential lifecycle observer.
	pub fn subscribe(&self, observer: Arc<dyn RequestObserver>) {
		self.observers.subscribe(observer);
	}

	/// Requests an initial token pair via the `password` grant. See
	/// [`TokenManager::request_token`].
	pub async fn request_token(
		&self,
		username: &str,
		password: &str,
		cancel: &CancellationToken,
	) -> Result<bool> {
		self.tokens.request_token(username, password, cancel).await
	}

	/// Rotates the token pair via the `refresh_token` grant. See
	/// [`TokenManager::refresh_access_token`].
	pub async fn refresh_access_token(&self, cancel: &CancellationToken) -> Result<bool> {
		self.tokens.refresh_access_token(cancel).await
	}

	/// Returns the server version string, cached after the first fetch; empty when the call
	/// fails.
	pub async fn version(&self, force_refresh: bool, cancel: &CancellationToken) -> Result<String> {
		let cached = if force_refresh { None } else { self.version.lock().clone() };

		if let Some(version) = cached {
			return Ok(version);
		}

		let descriptor = RequestDescriptor::new(Method::Get, "/version").without_auth();
		let fetched: String = self.executor.fetch(&descriptor, cancel).await?;

		if !fetched.is_empty() {
			*self.version.lock() = Some(fetched.clone());
		}

		Ok(fetched)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("tokens", &self.tokens)
			.finish()
	}
}

/// Server-side ids are strictly positive; a zero id is caller misuse and must be rejected before
/// any asynchronous work begins.
pub(crate) fn ensure_nonzero_id(id: i64, what: &str) -> Result<()> {
	if id == 0 {
		return Err(Error::invalid_argument(format!("{what} must be non-zero.")));
	}

	Ok(())
}
