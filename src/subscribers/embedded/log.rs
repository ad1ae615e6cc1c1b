//! # LogWriter: events to `tracing`
//!
//! Renders every [`Event`] as one structured `tracing` record. Failures are `warn`,
//! lifecycle milestones `info`, per-item rotation detail `debug`, and stale or
//! torn-down targets `trace`.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO  manifest applied manifest=m-42 zones=2
//! DEBUG item mounted zone=main item="IMAGE promo.png" cursor=3 delay_ms=12000
//! WARN  item failed zone=right item="VIDEO clip.mp4" reason="failed to load ...: 404 Not Found" retry_ms=3000
//! WARN  manifest fetch failed reason="http 502 Bad Gateway" retry_ms=5000
//! INFO  shutdown requested
//! ```

use async_trait::async_trait;
use tracing::{debug, info, trace, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let zone = e.zone_name();
        let item = e.item.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        let manifest = e.manifest.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ShutdownRequested => info!("shutdown requested"),
            EventKind::AllStoppedWithin => info!("all loops stopped within grace"),
            EventKind::GraceExceeded => warn!("grace exceeded, loops still running"),

            EventKind::ZoneReset => info!(zone, items = e.count, "zone reset"),
            EventKind::ZoneStopped => debug!(zone, "zone stopped"),
            EventKind::ZoneEmpty => debug!(zone, retry_ms = e.delay_ms, "no playlist items"),

            EventKind::ItemMounted => debug!(
                zone,
                item,
                cursor = e.cursor,
                delay_ms = e.delay_ms,
                "item mounted"
            ),
            EventKind::ItemCompleted => debug!(zone, item, "item completed"),
            EventKind::ItemFailed => {
                warn!(zone, item, reason, retry_ms = e.delay_ms, "item failed")
            }
            EventKind::ItemUnsupported => {
                warn!(zone, item, reason, retry_ms = e.delay_ms, "unknown item type")
            }
            EventKind::TargetTornDown => trace!(zone, item, "target torn down"),
            EventKind::StaleIgnored => trace!(zone, reason, "stale wakeup ignored"),

            EventKind::ManifestApplied => info!(manifest, zones = e.count, "manifest applied"),
            EventKind::ManifestUnchanged => trace!(manifest, "manifest unchanged"),
            EventKind::ManifestFailed => {
                warn!(reason, retry_ms = e.delay_ms, "manifest fetch failed")
            }

            EventKind::WidgetLoaded => info!(zone, widget = item, items = e.count, "widget loaded"),
            EventKind::WidgetFailed => warn!(zone, widget = item, reason, "widget fetch failed"),

            EventKind::SubscriberOverflow => warn!(subscriber = zone, reason, "subscriber overflow"),
            EventKind::SubscriberPanicked => {
                warn!(subscriber = zone, reason, "subscriber panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
