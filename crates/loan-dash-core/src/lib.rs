pub mod aggregate;
pub mod error;
pub mod filter;
pub mod store;
pub mod types;

#[cfg(feature = "extract")]
pub mod extract;

pub use error::DashboardError;
pub use types::*;

/// Standard result type for all loan-dash operations
pub type DashboardResult<T> = Result<T, DashboardError>;
