//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the built-in subscribers fed from the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! ZoneLoop / ManifestPoller / WidgetLoop ── publish(Event) ──► Bus
//!                                                              │
//!                                              Player::subscriber_listener
//!                                                              │
//!                                                        SubscriberSet::emit
//!                                                  ┌───────────┼───────────┐
//!                                                  ▼           ▼           ▼
//!                                              LogWriter  DebugSurface  custom ...
//! ```
//!
//! ## Subscriber types
//! - **Passive**: observe and react (logging via [`LogWriter`])
//! - **Stateful**: fold events into a view ([`DebugSurface`])

mod embedded;
mod subscribe;
mod subscriber_set;

pub use embedded::{DebugSurface, LogWriter};
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
