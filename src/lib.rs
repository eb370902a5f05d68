//! Async Rust client for Readstash-compatible read-it-later services—password/refresh OAuth 2.0
//! grants, a single instrumented request funnel, and the service's numeric-boolean wire format.
//!
//! The crate is organized around four pieces:
//!
//! - [`auth::TokenManager`] owns the mutable credential state and refreshes access tokens lazily
//!   once they are older than an hour, collapsing concurrent refreshes onto one in-flight call.
//! - [`request::RequestExecutor`] is the funnel every API call passes through: it attaches the
//!   bearer token, encodes parameters (`GET` query strings, JSON bodies elsewhere, booleans always
//!   as the integers `0`/`1`), fires the observer hooks, and classifies the HTTP outcome.
//! - [`annotations::validate`] rejects structurally invalid annotation ranges before a network
//!   round-trip is spent on them.
//! - [`client::Client`] wires everything together and exposes the thin endpoint wrappers
//!   (entries, tags, annotations, server version).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod annotations;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod models;
pub mod obs;
pub mod request;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use time;
pub use tokio_util;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
