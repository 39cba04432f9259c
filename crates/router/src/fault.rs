//! Fault boundary around a single sink emission
//!
//! A panicking sink is converted into [`SinkError::Panicked`] so the dispatch
//! loop can continue with the remaining sinks. This relies on unwinding; with
//! `panic = "abort"` the process still terminates.
//!
//! The first guarded emission wraps the process panic hook. Panics raised
//! inside a boundary skip the previous hook, so the router's `warn!` is their
//! only report and nothing is printed between the lines of a stderr sink.
//! Panics anywhere else reach the previous hook unchanged.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use contracts::{LogRecord, LogSink, SinkError};

thread_local! {
    /// Nesting depth of active boundaries on this thread
    static BOUNDARY_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !inside_boundary() {
                previous(info);
            }
        }));
    });
}

/// Whether the current thread is inside a guarded emission
pub(crate) fn inside_boundary() -> bool {
    BOUNDARY_DEPTH.with(|depth| depth.get() > 0)
}

struct BoundaryGuard;

impl BoundaryGuard {
    fn enter() -> Self {
        BOUNDARY_DEPTH.with(|depth| depth.set(depth.get() + 1));
        BoundaryGuard
    }
}

impl Drop for BoundaryGuard {
    fn drop(&mut self) {
        BOUNDARY_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Emit `record` to `sink`, turning a panic into an ordinary error
pub(crate) fn guarded_emit(sink: &dyn LogSink, record: LogRecord) -> Result<(), SinkError> {
    install_quiet_hook();
    let outcome = {
        let _guard = BoundaryGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(|| sink.emit(record)))
    };
    match outcome {
        Ok(result) => result,
        Err(payload) => Err(SinkError::panicked(sink.name(), panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(err) = payload.downcast_ref::<SinkError>() {
        err.to_string()
    } else {
        "unexpected error: <non-string panic payload>".to_string()
    }
}
