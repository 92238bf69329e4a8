//! # Client Components
//!
//! ## Session ([`session`])
//! The [`Session`] trait every operation is written against, and
//! [`RemoteSession`], its implementation over a framed TCP connection.
//!
//! ## Metrics ([`metrics`])
//! Per-action latency and failure recording, exportable to JSON.

pub mod metrics;
pub mod session;

// Re-export for convenience
pub use metrics::ActionMetrics;
pub use session::{RemoteSession, Session};
