//! Sink implementations
//!
//! Contains JsonSink (stream/file), UdpSink, TracingSink and MemorySink.

mod json;
mod layout;
mod memory;
mod network;
mod tracing_sink;

pub use self::json::{FileSinkConfig, JsonSink, SharedBuffer};
pub use self::layout::JsonLayout;
pub use self::memory::{CapturedRecord, FailureMode, MemorySink};
pub use self::network::{NetworkSinkConfig, UdpSink};
pub use self::tracing_sink::TracingSink;
