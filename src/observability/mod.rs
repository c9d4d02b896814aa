//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session store, sweeper, access gate, HTTP layer
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
