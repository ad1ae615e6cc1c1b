//! # Built-in subscribers
//!
//! - [`LogWriter`]: renders events as `tracing` records.
//! - [`DebugSurface`]: on-screen overlay of scheduler state (opt-in, `debug=1`).

mod debug;
mod log;

pub use debug::DebugSurface;
pub use log::LogWriter;
