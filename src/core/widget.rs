//! # WidgetLoop: a zone fed by a widget document.
//!
//! Same lifecycle as a manifest-driven zone, but the playlist comes from
//! `GET /api/widgets/{name}` and is refreshed on the widget's own schedule.
//!
//! ```text
//! init():
//!   fetch widget ──► ok  → cards → PlaylistItem::card(..), zone.reset(items)   (WidgetLoaded)
//!                └─► err → zone untouched                                      (WidgetFailed)
//!
//! run(token):
//!   init(); loop select (biased):
//!     token.cancelled() → stop(), exit
//!     refresh tick      → init()          (only if a refresh interval is set)
//!     zone.wakeup()     → zone.dispatch()
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::zone::ZoneLoop;
use crate::events::{Bus, Event, EventKind};
use crate::manifest::{PlaylistItem, WidgetData};
use crate::source::ContentSource;

/// Converts widget cards into rotation items, applying widget defaults.
pub fn widget_items(data: &WidgetData) -> Vec<PlaylistItem> {
    data.cards
        .iter()
        .map(|card| {
            let mut card = card.clone();
            card.bullets = card.visible_bullets(&data.defaults).to_vec();
            card.duration_sec = Some(data.defaults.duration_for(&card));
            card.fit = Some(data.defaults.fit_for(&card));
            PlaylistItem::card(card)
        })
        .collect()
}

/// Widget-driven rotation of one zone.
pub struct WidgetLoop {
    widget: Arc<str>,
    zone: ZoneLoop,
    source: Arc<dyn ContentSource>,
    bus: Bus,
    refresh: Option<Duration>,
}

impl WidgetLoop {
    pub fn new(
        widget: impl Into<Arc<str>>,
        zone: ZoneLoop,
        source: Arc<dyn ContentSource>,
        bus: Bus,
    ) -> Self {
        Self {
            widget: widget.into(),
            zone,
            source,
            bus,
            refresh: None,
        }
    }

    /// Re-fetches the widget every `interval` while running.
    pub fn with_refresh(mut self, interval: Option<Duration>) -> Self {
        self.refresh = interval.filter(|d| !d.is_zero());
        self
    }

    pub fn zone(&self) -> &ZoneLoop {
        &self.zone
    }

    pub fn zone_mut(&mut self) -> &mut ZoneLoop {
        &mut self.zone
    }

    /// Fetches the widget and restarts the rotation on success.
    ///
    /// On failure the current rotation keeps running. Returns whether the fetch succeeded.
    pub async fn init(&mut self) -> bool {
        let event = |kind| {
            Event::new(kind)
                .with_zone(self.zone.name().to_string())
                .with_item(Arc::clone(&self.widget))
        };

        match self.source.widget(&self.widget).await {
            Ok(data) => {
                let items = widget_items(&data);
                self.bus
                    .publish(event(EventKind::WidgetLoaded).with_count(items.len()));
                self.zone.set_theme(&data.theme);
                self.zone.reset(Arc::from(items)).await;
                true
            }
            Err(err) => {
                self.bus
                    .publish(event(EventKind::WidgetFailed).with_reason(err.as_message()));
                false
            }
        }
    }

    /// Cancels the zone timer and clears the container.
    pub async fn stop(&mut self) {
        self.zone.stop().await;
    }

    pub async fn run(mut self, token: CancellationToken) {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                self.stop().await;
                return;
            }
            _ = self.init() => {}
        }

        let mut refresh = self.refresh.map(|every| {
            let mut tick = interval_at(Instant::now() + every, every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick
        });

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = next_tick(&mut refresh) => { self.init().await; }
                wakeup = self.zone.wakeup() => self.zone.dispatch(wakeup).await,
            }
        }
        self.stop().await;
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(tick) => {
            tick.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Card, FitMode, WidgetDefaults};

    #[test]
    fn cards_pick_up_widget_defaults() {
        let data = WidgetData {
            cards: vec![
                Card {
                    title: Some("Facials".into()),
                    bullets: (0..5).map(|i| i.to_string()).collect(),
                    ..Card::default()
                },
                Card {
                    title: Some("Laser".into()),
                    duration_sec: Some(Duration::from_secs(20)),
                    fit: Some(FitMode::Contain),
                    ..Card::default()
                },
            ],
            defaults: WidgetDefaults {
                duration_sec: Some(Duration::from_secs(8)),
                fit: None,
                max_bullets: Some(3),
            },
            ..WidgetData::default()
        };

        let items = widget_items(&data);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].duration, Some(Duration::from_secs(8)));
        assert_eq!(items[0].fit, Some(FitMode::Cover));
        assert_eq!(items[1].duration, Some(Duration::from_secs(20)));
        assert_eq!(items[1].fit, Some(FitMode::Contain));
        let crate::manifest::Media::Widget(card) = &items[0].media else {
            panic!("expected a card");
        };
        assert_eq!(card.bullets.len(), 3);
    }

    #[test]
    fn cards_without_any_duration_show_for_twelve_seconds() {
        let data = WidgetData {
            cards: vec![Card::default()],
            ..WidgetData::default()
        };
        assert_eq!(widget_items(&data)[0].duration, Some(Duration::from_secs(12)));
    }
}
