//! # Runtime events emitted by zones, the poller, widgets and the player.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Rotation events**: what a zone mounts, schedules, skips and tears down
//! - **Manifest events**: poll outcomes (applied, unchanged, failed)
//! - **Widget events**: widget data loads and failures
//! - **Runtime events**: shutdown and subscriber health
//!
//! The [`Event`] struct carries metadata such as the zone name, item label,
//! manifest id, reasons and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use screenvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ItemFailed)
//!     .with_zone("main")
//!     .with_item("IMAGE promo.png")
//!     .with_reason("404 Not Found")
//!     .with_delay(Duration::from_secs(3));
//!
//! assert_eq!(ev.kind, EventKind::ItemFailed);
//! assert_eq!(ev.zone.as_deref(), Some("main"));
//! assert_eq!(ev.delay_ms, Some(3000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `zone`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `zone`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Shutdown events ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// All loops stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some loops did not stop in time.
    GraceExceeded,

    // === Rotation events ===
    /// A zone received a new playlist and restarted from cursor zero.
    ///
    /// Sets:
    /// - `zone`: zone name
    /// - `count`: playlist length
    ZoneReset,

    /// A zone was stopped and cleared.
    ///
    /// Sets:
    /// - `zone`: zone name
    ZoneStopped,

    /// A zone advanced over an empty playlist and shows nothing.
    ///
    /// Sets:
    /// - `zone`: zone name
    /// - `delay_ms`: re-check interval
    ZoneEmpty,

    /// An item was mounted.
    ///
    /// Sets:
    /// - `zone`: zone name
    /// - `item`: item label (e.g. `IMAGE promo.png`)
    /// - `cursor`: rotation cursor after selection
    /// - `delay_ms`: display time, absent for self-terminating items
    ItemMounted,

    /// A self-terminating item signalled completion.
    ///
    /// Sets:
    /// - `zone`, `item`
    ItemCompleted,

    /// An item failed to load; the zone skips it after a fallback delay.
    ///
    /// Sets:
    /// - `zone`, `item`
    /// - `reason`: load error
    /// - `delay_ms`: fallback delay
    ItemFailed,

    /// An item carried an unknown type tag; the zone skips it after a fallback delay.
    ///
    /// Sets:
    /// - `zone`, `item`
    /// - `delay_ms`: fallback delay
    ItemUnsupported,

    /// The zone's current target was torn down.
    ///
    /// Sets:
    /// - `zone`, `item`
    TargetTornDown,

    /// A signal or timer for a superseded target was ignored.
    ///
    /// Sets:
    /// - `zone`
    /// - `reason`: what was ignored
    StaleIgnored,

    // === Manifest events ===
    /// A changed manifest was applied to every zone.
    ///
    /// Sets:
    /// - `manifest`: manifest id
    /// - `count`: number of zones reset
    ManifestApplied,

    /// The fetched manifest matches the applied one; no zone touched.
    ///
    /// Sets:
    /// - `manifest`: manifest id
    ManifestUnchanged,

    /// The manifest fetch failed; zones keep running.
    ///
    /// Sets:
    /// - `reason`: error message
    /// - `delay_ms`: time until the next poll
    ManifestFailed,

    // === Widget events ===
    /// Widget data was fetched and the widget rotation restarted.
    ///
    /// Sets:
    /// - `zone`: widget zone
    /// - `item`: widget name
    /// - `count`: number of cards
    WidgetLoaded,

    /// Widget data fetch failed; the current rotation keeps running.
    ///
    /// Sets:
    /// - `zone`: widget zone
    /// - `item`: widget name
    /// - `reason`: error message
    WidgetFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Zone (or subscriber) the event is about.
    pub zone: Option<Arc<str>>,
    /// Item label or widget name.
    pub item: Option<Arc<str>>,
    /// Manifest id.
    pub manifest: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Scheduled delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Rotation cursor.
    pub cursor: Option<u64>,
    /// Item, card or zone count.
    pub count: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            zone: None,
            item: None,
            manifest: None,
            reason: None,
            delay_ms: None,
            cursor: None,
            count: None,
        }
    }

    /// Attaches a zone name.
    #[inline]
    pub fn with_zone(mut self, zone: impl Into<Arc<str>>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Attaches an item label.
    #[inline]
    pub fn with_item(mut self, item: impl Into<Arc<str>>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Attaches a manifest id.
    #[inline]
    pub fn with_manifest(mut self, id: impl Into<Arc<str>>) -> Self {
        self.manifest = Some(id.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a rotation cursor.
    #[inline]
    pub fn with_cursor(mut self, cursor: u64) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Attaches a count.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_zone(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_zone(subscriber)
            .with_reason(info)
    }

    /// Zone name, or `"-"`.
    #[inline]
    pub fn zone_name(&self) -> &str {
        self.zone.as_deref().unwrap_or("-")
    }

    /// Delay as a `Duration`, if set.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::ZoneReset);
        let b = Event::new(EventKind::ZoneReset);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_saturates_at_u32_millis() {
        let ev = Event::new(EventKind::ZoneEmpty).with_delay(Duration::from_secs(u64::MAX / 4));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
        assert_eq!(ev.zone_name(), "-");
    }
}
