//! Token acquisition and lazy refresh with a singleflight gate.
//!
//! The manager guarantees callers a currently-valid access token where possible: tokens older
//! than [`Credentials::TOKEN_TTL`] trigger a refresh before the next authenticated dispatch.
//! Concurrent callers that both observe a stale token collapse onto one in-flight refresh—the
//! loser re-checks staleness under the gate and reuses the winner's tokens instead of racing a
//! second `grant_type=refresh_token` call.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, RefreshStats, TokenSecret},
	config::ClientConfig,
	error::TransportError,
	events::ObserverRegistry,
	http::{HttpTransport, Method, TransportRequest, TransportResponse},
	models::TokenGrant,
	obs::{self, CallKind, CallOutcome, CallSpan},
	request::decode_body,
};

/// Owns access/refresh token state and the refresh-decision policy.
pub struct TokenManager {
	config: Arc<ClientConfig>,
	transport: Arc<dyn HttpTransport>,
	observers: Arc<ObserverRegistry>,
	credentials: Mutex<Credentials>,
	refresh_gate: AsyncMutex<()>,
	refresh_stats: RefreshStats,
}
impl TokenManager {
	pub(crate) fn new(
		config: Arc<ClientConfig>,
		transport: Arc<dyn HttpTransport>,
		observers: Arc<ObserverRegistry>,
	) -> Self {
		Self {
			config,
			transport,
			observers,
			credentials: Mutex::new(Credentials::default()),
			refresh_gate: AsyncMutex::new(()),
			refresh_stats: RefreshStats::default(),
		}
	}

	/// Current access token, if one has been acquired.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.credentials.lock().access_token.clone()
	}

	/// Current refresh token, if the server issued one.
	pub fn refresh_token(&self) -> Option<TokenSecret> {
		self.credentials.lock().refresh_token.clone()
	}

	/// Instant of the last successful acquisition or refresh.
	pub fn last_refresh_at(&self) -> Option<OffsetDateTime> {
		self.credentials.lock().last_refresh_at
	}

	/// Counters for refresh attempts, successes, and failures.
	pub fn refresh_stats(&self) -> &RefreshStats {
		&self.refresh_stats
	}

	/// Restores a previously persisted token pair. Token persistence is the caller's concern;
	/// passing the instant the pair was obtained keeps the staleness policy accurate.
	pub fn restore(
		&self,
		access_token: impl Into<String>,
		refresh_token: impl Into<String>,
		last_refresh_at: Option<OffsetDateTime>,
	) {
		let mut credentials = self.credentials.lock();

		credentials.access_token = Some(TokenSecret::new(access_token));
		credentials.refresh_token = Some(TokenSecret::new(refresh_token));
		credentials.last_refresh_at = last_refresh_at;
	}

	/// Clears all token state, regressing the manager to unauthenticated.
	pub fn clear(&self) {
		*self.credentials.lock() = Credentials::default();
	}

	/// Requests an initial token pair via the `password` grant.
	///
	/// Empty `username` or `password` raise [`Error::InvalidArgument`] before any network call.
	/// On success both tokens are stored and `Ok(true)` is returned; HTTP or transport failures
	/// leave existing state untouched and return `Ok(false)`.
	pub async fn request_token(
		&self,
		username: &str,
		password: &str,
		cancel: &CancellationToken,
	) -> Result<bool> {
		if username.is_empty() || password.is_empty() {
			return Err(Error::invalid_argument("Username and password must be non-empty."));
		}

		const KIND: CallKind = CallKind::PasswordGrant;

		let span = CallSpan::new(KIND, "request_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let body = json!({
			"grant_type": "password",
			"client_id": self.config.client_id(),
			"client_secret": self.config.client_secret(),
			"username": username,
			"password": password,
		})
		.to_string();
		let granted = span.instrument(self.exchange_grant_with(body, cancel)).await;

		obs::record_call_outcome(KIND, if granted { CallOutcome::Success } else { CallOutcome::Failure });

		Ok(granted)
	}

	/// Returns the current access token, refreshing it first when it has gone stale.
	///
	/// The returned token may still be stale if the refresh failed (or no refresh token is set);
	/// dispatch-time callers use [`bearer_for_dispatch`](Self::bearer_for_dispatch), which
	/// short-circuits that case instead of sending a doomed request.
	pub async fn valid_access_token(&self, cancel: &CancellationToken) -> Option<TokenSecret> {
		self.ensure_fresh(cancel).await;

		self.access_token()
	}

	/// Rotates the token pair via the `refresh_token` grant.
	///
	/// A missing refresh token is caller misuse and raises [`Error::InvalidArgument`] without
	/// contacting the transport. On success both tokens are replaced, the refresh instant is
	/// bumped, and `credentials_refreshed` observers fire; HTTP or transport failures leave state
	/// untouched and return `Ok(false)`.
	pub async fn refresh_access_token(&self, cancel: &CancellationToken) -> Result<bool> {
		let _gate = self.refresh_gate.lock().await;

		self.refresh_locked(cancel).await
	}

	/// Resolves the bearer token for an authenticated dispatch.
	///
	/// Returns `None`—so the executor can short-circuit with `AuthUnavailable`—when no access
	/// token exists, or when the token is stale and the refresh attempt could not replace it.
	pub(crate) async fn bearer_for_dispatch(&self, cancel: &CancellationToken) -> Option<TokenSecret> {
		if !self.credentials.lock().has_access_token() {
			return None;
		}

		self.ensure_fresh(cancel).await;

		let now = OffsetDateTime::now_utc();
		let credentials = self.credentials.lock();

		if credentials.is_stale_at(now) {
			return None;
		}

		credentials.access_token.clone()
	}

	// Refreshes only when the token is stale and a refresh token exists, collapsing concurrent
	// callers onto a single in-flight grant.
	async fn ensure_fresh(&self, cancel: &CancellationToken) {
		{
			let credentials = self.credentials.lock();

			if !credentials.is_stale_at(OffsetDateTime::now_utc())
				|| !credentials.has_refresh_token()
			{
				return;
			}
		}

		let _gate = self.refresh_gate.lock().await;

		// Another caller may have completed the rotation while we waited on the gate.
		if !self.credentials.lock().is_stale_at(OffsetDateTime::now_utc()) {
			return;
		}

		let _ = self.refresh_locked(cancel).await;
	}

	// Performs one refresh grant. The caller must hold `refresh_gate`.
	async fn refresh_locked(&self, cancel: &CancellationToken) -> Result<bool> {
		if !self.credentials.lock().has_refresh_token() {
			return Err(Error::invalid_argument(
				"Refresh token is not set; it is issued by the first successful request_token call.",
			));
		}

		const KIND: CallKind = CallKind::RefreshGrant;

		let span = CallSpan::new(KIND, "refresh_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_stats.record_attempt();

		let refresh_token = self
			.credentials
			.lock()
			.refresh_token
			.as_ref()
			.map(|token| token.expose().to_string())
			.unwrap_or_default();
		let body = json!({
			"grant_type": "refresh_token",
			"client_id": self.config.client_id(),
			"client_secret": self.config.client_secret(),
			"refresh_token": refresh_token,
		})
		.to_string();
		let rotated = span.instrument(self.exchange_grant_with(body, cancel)).await;

		if rotated {
			obs::record_call_outcome(KIND, CallOutcome::Success);
			self.refresh_stats.record_success();
			self.observers.notify_credentials_refreshed();
		} else {
			obs::record_call_outcome(KIND, CallOutcome::Failure);
			self.refresh_stats.record_failure();
		}

		Ok(rotated)
	}

	// Posts a grant body to the token endpoint and stores the resulting pair. Any failure—HTTP,
	// transport, cancellation, or an unparseable/blank grant—leaves state untouched.
	async fn exchange_grant_with(&self, body: String, cancel: &CancellationToken) -> bool {
		let response = match self.post_token_request(body, cancel).await {
			Ok(response) => response,
			Err(_) => return false,
		};

		if !response.is_success() {
			return false;
		}

		let grant: TokenGrant = decode_body(&response.body);

		if grant.access_token.is_empty() {
			return false;
		}

		self.credentials.lock().store_grant(
			TokenSecret::new(grant.access_token),
			TokenSecret::new(grant.refresh_token),
			OffsetDateTime::now_utc(),
		);

		true
	}

	async fn post_token_request(
		&self,
		body: String,
		cancel: &CancellationToken,
	) -> Result<TransportResponse, TransportError> {
		let request = TransportRequest {
			method: Method::Post,
			url: self.config.token_url().clone(),
			bearer: None,
			body: Some(body),
		};

		match cancel.run_until_cancelled(self.transport.send(request)).await {
			Some(result) => result,
			None => Err(TransportError::Cancelled),
		}
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let credentials = self.credentials.lock();

		f.debug_struct("TokenManager")
			.field("access_token_set", &credentials.has_access_token())
			.field("refresh_token_set", &credentials.has_refresh_token())
			.field("last_refresh_at", &credentials.last_refresh_at)
			.finish()
	}
}
