//! # screenvisor
//!
//! **Screenvisor** drives unattended digital signage screens. Each screen polls a
//! content manifest and rotates images, videos, embedded pages and data-driven
//! cards through one or more independent zones, forever, with nobody watching.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                      ┌──────────────────────────────┐
//!                      │ ContentSource (HttpSource)   │
//!                      │  GET /api/manifest/{screen}  │
//!                      │  GET /api/widgets/{name}     │
//!                      └──────┬────────────────┬──────┘
//!                             ▼                ▼
//!                    ┌────────────────┐  ┌────────────┐
//!                    │ ManifestPoller │  │ WidgetLoop │ ...
//!                    └──┬──────────┬──┘  └─────┬──────┘
//!              reset()  │          │ reset()   │ (own ZoneLoop)
//!                       ▼          ▼           ▼
//!               ┌──────────┐ ┌──────────┐ ┌──────────┐
//!               │ ZoneLoop │ │ ZoneLoop │ │ ZoneLoop │   one actor per zone
//!               │  "main"  │ │ "right"  │ │ "cards"  │
//!               └────┬─────┘ └────┬─────┘ └────┬─────┘
//!                    │ Adapter::mount / teardown
//!                    ▼            ▼            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                      Display (ConsoleDisplay, ...)                │
//! └───────────────────────────────────────────────────────────────────┘
//!
//!   every loop ── publish(Event) ──► Bus ──► subscriber_listener (Player)
//!                                                      │
//!                                               SubscriberSet
//!                                          ┌───────────┼───────────┐
//!                                          ▼           ▼           ▼
//!                                      LogWriter  DebugSurface   custom
//! ```
//!
//! ### Zone lifecycle
//! ```text
//! ZoneHandle::reset(playlist) ──► ZoneLoop (actor)
//!
//! loop {
//!   ├─► cancel timer, tear down current target (signal link detached first)
//!   ├─► mount playlist[cursor % len], cursor += 1
//!   │       ├─ timed item  → arm(max(2s, duration or zone default))
//!   │       ├─ video       → wait for Ended signal
//!   │       ├─ load error  → ItemFailed, arm(3s)
//!   │       └─ unknown     → ItemUnsupported, arm(3s)
//!   ├─► empty playlist → clear, arm(5s)
//!   └─► stale timers / signals of retired targets → ignored
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                         |
//! |-------------------|-----------------------------------------------------------|--------------------------------------------|
//! | **Rotation**      | Per-zone scheduling with at most one mounted target.      | [`ZoneLoop`], [`ZoneHandle`], [`TimingPolicy`] |
//! | **Manifests**     | Polling, change detection, both wire shapes.             | [`ManifestPoller`], [`Manifest`]           |
//! | **Widgets**       | Card rotations and ticker text from widget documents.     | [`WidgetLoop`], [`WidgetData`]             |
//! | **Rendering**     | Item → surface dispatch and display backends.            | [`Adapter`], [`Display`], [`ConsoleDisplay`] |
//! | **Subscriber API**| Hook into runtime events (logging, overlay, custom).      | [`Subscribe`], [`LogWriter`], [`DebugSurface`] |
//! | **Errors**        | Typed errors for fetches, media and the runtime.          | [`FetchError`], [`MediaError`], [`RuntimeError`] |
//! | **Configuration** | Centralized delays, capacities and layouts.              | [`Config`], [`Layout`]                     |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use screenvisor::{Config, Layout, LogWriter, Player, ScreenAddress, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let address = ScreenAddress::parse("http://signage.local:8000/player-zones/lobby")?;
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!
//!     let player = Player::builder(Config::default(), address)
//!         .with_layout(Layout::zoned())
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     player.run().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod display;
mod error;
mod events;
mod manifest;
mod policies;
mod render;
mod screen;
mod source;
mod subscribers;

// ---- Public re-exports ----

pub use self::core::{
    Config, DEFAULT_TICKER_FALLBACK, DEFAULT_TICKER_WIDGET, Layout, ManifestPoller, Player,
    PlayerBuilder, PollOutcome, ScheduleTimer, TICKER_SEPARATOR, TimerTicket, Wakeup,
    WidgetLoop, WidgetSpec, ZoneBinding, ZoneCommand, ZoneHandle, ZoneLoop, ZoneSpec,
    widget_items,
};
pub use display::{ConsoleDisplay, Display};
pub use error::{FetchError, MediaError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use manifest::{
    AssetRef, Card, DEFAULT_PLAYLIST, DocumentError, FitMode, Header, Manifest, Media,
    PlaylistItem, Theme, WidgetData, WidgetDefaults,
};
pub use policies::{Schedule, TimingPolicy};
pub use render::{
    Adapter, Backdrop, ElementId, Mount, RenderTarget, SignalKind, SignalLink, Surface, TargetId,
    TargetSignal,
};
pub use screen::{Endpoints, ScreenAddress, ScreenId};
pub use source::{ContentSource, HttpSource};
pub use subscribers::{DebugSurface, LogWriter, Subscribe, SubscriberSet};
