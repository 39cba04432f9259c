//! # Router
//!
//! Severity-based log routing.
//!
//! Responsibilities:
//! - Split records at `Level::Error` into standard / error groups
//! - Fan out to every enabled sink in the group, each in a fault boundary
//! - Aggregate per-sink failures into one result
//! - Propagate attributes and scopes to every sink

mod builder;
pub mod error;
mod factory;
mod fault;
mod logger;
pub mod metrics;
mod router;
pub mod sinks;

pub use builder::RouterBuilder;
pub use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError, Value};
pub use error::{AggregateEmitError, RouterError};
pub use factory::{create_router, create_sink};
pub use logger::Logger;
pub use metrics::{MetricsSnapshot, RouterMetrics};
pub use router::MultiTargetRouter;
pub use sinks::{JsonSink, MemorySink, SharedBuffer, TracingSink, UdpSink};
