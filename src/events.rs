//! Request lifecycle observation points.
//!
//! Instead of hidden publish/subscribe lists tied to object identity, subscribers register
//! explicitly on an [`ObserverRegistry`]. Two observation points exist per dispatch—pre-dispatch
//! and post-dispatch—plus a credentials-refreshed notification emitted after every successful
//! token rotation. Observers receive read-only metadata and must not block; all subscribers fire
//! synchronously, in subscription order, on every call.

// self
use crate::{
	_prelude::*,
	http::{Method, TransportResponse},
	request::Params,
};

/// Read-only request metadata shared with observers; lives for exactly one dispatch.
#[derive(Clone, Debug)]
pub struct RequestContext {
	/// HTTP verb of the request.
	pub method: Method,
	/// Relative resource path (e.g. `/entries/12`).
	pub target_path: String,
	/// Parameters submitted along with the request, in insertion order.
	pub parameters: Params,
}

/// Snapshot of the raw HTTP response carried by the post-dispatch hook.
#[derive(Clone, Debug)]
pub struct ResponseSnapshot {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl From<&TransportResponse> for ResponseSnapshot {
	fn from(response: &TransportResponse) -> Self {
		Self { status: response.status, body: response.body.clone() }
	}
}

/// Subscriber interface for request and credential lifecycle events.
///
/// All methods default to no-ops so implementations only override the hooks they care about.
pub trait RequestObserver: Send + Sync {
	/// Fires once per executed call, before authentication or network work begins.
	fn before_dispatch(&self, _context: &RequestContext) {}

	/// Fires exactly once per call that reached the transport, even on failure; `response` is
	/// `None` when the attempt failed at the transport level.
	fn after_dispatch(&self, _context: &RequestContext, _response: Option<&ResponseSnapshot>) {}

	/// Fires after every successful refresh-token rotation.
	fn credentials_refreshed(&self) {}
}

/// Ordered, thread-safe collection of [`RequestObserver`] subscribers.
#[derive(Default)]
pub struct ObserverRegistry {
	observers: RwLock<Vec<Arc<dyn RequestObserver>>>,
}
impl ObserverRegistry {
	/// Registers an observer. Subscriptions accumulate; every subscriber fires on every call, in
	/// the order it was registered.
	pub fn subscribe(&self, observer: Arc<dyn RequestObserver>) {
		self.observers.write().push(observer);
	}

	/// Number of registered subscribers.
	pub fn len(&self) -> usize {
		self.observers.read().len()
	}

	/// Returns `true` when no observer is registered.
	pub fn is_empty(&self) -> bool {
		self.observers.read().is_empty()
	}

	// The subscriber list is snapshotted before invocation so a callback that subscribes another
	// observer cannot deadlock against the registry lock.
	fn snapshot(&self) -> Vec<Arc<dyn RequestObserver>> {
		self.observers.read().clone()
	}

	pub(crate) fn notify_before(&self, context: &RequestContext) {
		for observer in self.snapshot() {
			observer.before_dispatch(context);
		}
	}

	pub(crate) fn notify_after(&self, context: &RequestContext, response: Option<&ResponseSnapshot>) {
		for observer in self.snapshot() {
			observer.after_dispatch(context, response);
		}
	}

	pub(crate) fn notify_credentials_refreshed(&self) {
		for observer in self.snapshot() {
			observer.credentials_refreshed();
		}
	}
}
impl Debug for ObserverRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ObserverRegistry").field("subscribers", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct Tagged {
		tag: &'static str,
		log: Arc<Mutex<Vec<String>>>,
	}
	impl RequestObserver for Tagged {
		fn before_dispatch(&self, context: &RequestContext) {
			self.log.lock().push(format!("{}:before:{}", self.tag, context.target_path));
		}

		fn after_dispatch(&self, _context: &RequestContext, response: Option<&ResponseSnapshot>) {
			let status = response.map(|r| r.status.to_string()).unwrap_or_else(|| "none".into());

			self.log.lock().push(format!("{}:after:{status}", self.tag));
		}

		fn credentials_refreshed(&self) {
			self.log.lock().push(format!("{}:refreshed", self.tag));
		}
	}

	fn context() -> RequestContext {
		RequestContext {
			method: Method::Delete,
			target_path: "/entries/7".into(),
			parameters: Params::new(),
		}
	}

	#[test]
	fn subscribers_fire_in_subscription_order() {
		let registry = ObserverRegistry::default();
		let log = Arc::new(Mutex::new(Vec::new()));

		registry.subscribe(Arc::new(Tagged { tag: "first", log: log.clone() }));
		registry.subscribe(Arc::new(Tagged { tag: "second", log: log.clone() }));

		registry.notify_before(&context());
		registry.notify_after(&context(), None);
		registry.notify_credentials_refreshed();

		assert_eq!(
			*log.lock(),
			vec![
				"first:before:/entries/7",
				"second:before:/entries/7",
				"first:after:none",
				"second:after:none",
				"first:refreshed",
				"second:refreshed",
			],
		);
	}

	#[test]
	fn post_dispatch_carries_the_response_status() {
		let registry = ObserverRegistry::default();
		let log = Arc::new(Mutex::new(Vec::new()));

		registry.subscribe(Arc::new(Tagged { tag: "only", log: log.clone() }));
		registry.notify_after(&context(), Some(&ResponseSnapshot { status: 404, body: String::new() }));

		assert_eq!(*log.lock(), vec!["only:after:404"]);
	}
}
