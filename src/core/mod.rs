//! Runtime core: rotation loops and orchestration.
//!
//! Modules:
//! - [`zone`]: one zone's rotation state machine and its actor loop;
//! - [`timer`]: the single epoch-tagged deadline each zone owns;
//! - [`poller`]: manifest polling and zone resets on change;
//! - [`widget`]: zones fed by widget documents;
//! - [`layout`]: which zones exist and what feeds them;
//! - [`supervisor`]: the [`Player`], spawning all of the above and shutting them down;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod layout;
mod poller;
mod shutdown;
mod supervisor;
mod timer;
mod widget;
mod zone;

pub use builder::PlayerBuilder;
pub use config::{Config, DEFAULT_TICKER_FALLBACK};
pub use layout::{DEFAULT_TICKER_WIDGET, Layout, WidgetSpec, ZoneSpec};
pub use poller::{ManifestPoller, PollOutcome, TICKER_SEPARATOR, ZoneBinding};
pub use supervisor::Player;
pub use timer::{ScheduleTimer, TimerTicket};
pub use widget::{WidgetLoop, widget_items};
pub use zone::{Wakeup, ZoneCommand, ZoneHandle, ZoneLoop};
