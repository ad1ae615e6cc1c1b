//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by zone loops, the manifest poller,
//! widget loops, the player and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ZoneLoop`, `ManifestPoller`, `WidgetLoop`, `Player`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Player::subscriber_listener()`, which fans out to the
//!   `SubscriberSet` (`LogWriter`, `DebugSurface`, user subscribers).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
