//! Mounting playlist items on a display.
//!
//! ## Contents
//! - [`Adapter`] resolves items to [`Surface`]s, mounts and tears them down
//! - [`RenderTarget`] owned handle of one mounted item
//! - [`SignalLink`], [`TargetSignal`], [`TargetId`] completion/failure plumbing
//!
//! One adapter per zone. The zone owns at most one [`RenderTarget`] at a time and
//! always calls [`Adapter::teardown`] before the next [`Adapter::mount`].

mod adapter;
mod signal;
mod surface;

pub use adapter::{Adapter, Mount, RenderTarget};
pub use signal::{SignalKind, SignalLink, TargetId, TargetSignal};
pub use surface::{Backdrop, ElementId, Surface};
