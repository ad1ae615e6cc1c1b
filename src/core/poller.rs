//! # ManifestPoller: watches the manifest and restarts zones on change.
//!
//! ```text
//! run(token):
//!   loop {
//!     poll_once()
//!       ├─ fetch error           → ManifestFailed, zones untouched
//!       ├─ same identity, no
//!       │  force_reload          → ManifestUnchanged, zones untouched
//!       └─ changed               → header, ticker, ZoneHandle::reset(playlist) per zone
//!                                  → ManifestApplied, identity recorded
//!     sleep(poll_interval)       (cancellable; fixed, no backoff)
//!   }
//! ```
//!
//! The poller is the only writer of the applied manifest identity. It never touches
//! zone state directly: resets are queued to each zone actor.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::zone::ZoneHandle;
use crate::display::Display;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::manifest::Manifest;
use crate::screen::{Endpoints, ScreenId};
use crate::source::ContentSource;

/// Separator between ticker lines.
pub const TICKER_SEPARATOR: &str = "  •  ";

/// Result of one [`ManifestPoller::poll_once`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    Unchanged,
    Failed(FetchError),
}

/// A zone and the manifest playlist that feeds it.
#[derive(Clone, Debug)]
pub struct ZoneBinding {
    pub playlist: String,
    pub handle: ZoneHandle,
}

#[derive(Clone, Debug)]
struct Ticker {
    widget: String,
    fallback: String,
}

pub struct ManifestPoller {
    source: Arc<dyn ContentSource>,
    display: Arc<dyn Display>,
    endpoints: Endpoints,
    screen: ScreenId,
    zones: Vec<ZoneBinding>,
    ticker: Option<Ticker>,
    interval: Duration,
    bus: Bus,
    /// `Some(id)` once a manifest was applied; the inner id may itself be absent.
    applied: Option<Option<String>>,
}

impl ManifestPoller {
    pub fn new(
        source: Arc<dyn ContentSource>,
        display: Arc<dyn Display>,
        endpoints: Endpoints,
        screen: ScreenId,
        interval: Duration,
        bus: Bus,
    ) -> Self {
        Self {
            source,
            display,
            endpoints,
            screen,
            zones: Vec::new(),
            ticker: None,
            interval,
            bus,
            applied: None,
        }
    }

    /// Feeds `playlist` to the zone behind `handle` on every apply.
    pub fn bind(mut self, playlist: impl Into<String>, handle: ZoneHandle) -> Self {
        self.zones.push(ZoneBinding {
            playlist: playlist.into(),
            handle,
        });
        self
    }

    /// Refreshes the ticker from `widget` on every apply.
    pub fn with_ticker(mut self, widget: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.ticker = Some(Ticker {
            widget: widget.into(),
            fallback: fallback.into(),
        });
        self
    }

    /// Identity of the last applied manifest (`None` before the first apply).
    pub fn applied(&self) -> Option<Option<&str>> {
        self.applied.as_ref().map(Option::as_deref)
    }

    /// A manifest without an id is applied once and then treated as unchanged
    /// until its id appears or `force_reload` is set.
    fn needs_apply(&self, manifest: &Manifest) -> bool {
        manifest.force_reload || self.applied.as_ref() != Some(&manifest.manifest_id)
    }

    /// Fetches once and applies the manifest if it changed.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.source.manifest(&self.screen).await {
            Err(err) => {
                self.bus.publish(
                    Event::new(EventKind::ManifestFailed)
                        .with_reason(err.as_message())
                        .with_delay(self.interval),
                );
                PollOutcome::Failed(err)
            }
            Ok(manifest) if !self.needs_apply(&manifest) => {
                self.bus.publish(
                    Event::new(EventKind::ManifestUnchanged)
                        .with_manifest(manifest.display_id().to_string()),
                );
                PollOutcome::Unchanged
            }
            Ok(manifest) => {
                self.apply(manifest).await;
                PollOutcome::Applied
            }
        }
    }

    async fn apply(&mut self, manifest: Manifest) {
        let mut header = manifest.header.clone();
        header.logo_url = header.logo_url.map(|u| self.endpoints.resolve(&u));
        self.display.set_header(&header).await;

        if let Some(ticker) = &self.ticker {
            let text = self.ticker_text(ticker).await;
            self.display.set_ticker(&text).await;
        }

        let mut reset = 0;
        for zone in &self.zones {
            if zone.handle.reset(manifest.playlist(&zone.playlist)).await {
                reset += 1;
            }
        }

        self.bus.publish(
            Event::new(EventKind::ManifestApplied)
                .with_manifest(manifest.display_id().to_string())
                .with_count(reset),
        );
        self.applied = Some(manifest.manifest_id);
    }

    async fn ticker_text(&self, ticker: &Ticker) -> String {
        let event = |kind| {
            Event::new(kind)
                .with_zone("ticker")
                .with_item(ticker.widget.clone())
        };
        match self.source.widget(&ticker.widget).await {
            Ok(data) => {
                let lines: Vec<&str> = data.lines().collect();
                self.bus
                    .publish(event(EventKind::WidgetLoaded).with_count(lines.len()));
                if lines.is_empty() {
                    ticker.fallback.clone()
                } else {
                    lines.join(TICKER_SEPARATOR)
                }
            }
            Err(err) => {
                self.bus
                    .publish(event(EventKind::WidgetFailed).with_reason(err.as_message()));
                ticker.fallback.clone()
            }
        }
    }

    /// Polls forever on a fixed interval until `token` is cancelled.
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = self.poll_once() => {}
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
