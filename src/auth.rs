//! OAuth token lifecycle: acquisition, staleness tracking, and lazy refresh.

pub mod credentials;
pub mod manager;

mod stats;

pub use credentials::*;
pub use manager::*;
pub use stats::RefreshStats;
