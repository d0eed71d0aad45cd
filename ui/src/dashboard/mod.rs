//! Dashboard data: the indicators payload and its chart aggregations.

pub mod aggregate;
pub mod fetch;
pub mod payload;

pub use fetch::load_dashboard;
pub use payload::{DashboardPayload, LoadError};
