//! Rotation timing policy.
//!
//! This module groups the knobs that control **when** a zone moves on.
//!
//! ## Contents
//! - [`TimingPolicy`] fixed delays (floor / default / fallback / empty re-check)
//! - [`Schedule`] the decision for one mounted item (timer or completion signal)
//!
//! ## Quick wiring
//! ```text
//! Config ──► Config::timing() ──► TimingPolicy
//!      └─► core::zone::ZoneLoop uses:
//!           - schedule_for(item) after each mount
//!           - fallback after a load failure or unknown item
//!           - empty_retry while the playlist is empty
//! ```

mod timing;

pub use timing::{Schedule, TimingPolicy};
