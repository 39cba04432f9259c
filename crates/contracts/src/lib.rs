//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend only on this crate; reverse dependencies are prohibited.
//!
//! ## Routing model
//! - Records carry a [`Level`]; the router splits them at [`ERROR_THRESHOLD`]
//! - Destinations implement [`LogSink`] and are shared as [`SharedSink`]
//! - Sink derivation (`with_attrs` / `with_scope`) never mutates the receiver

mod blueprint;
mod error;
mod level;
mod record;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use level::*;
pub use record::*;
pub use sink::*;
