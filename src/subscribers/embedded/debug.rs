//! # DebugSurface: textual overlay of scheduler state.
//!
//! Listens to rotation and manifest events and keeps one line per zone plus the
//! screen identity, the applied manifest id and the last manifest error. After each
//! relevant event the whole text is pushed to [`Display::show_overlay`].
//!
//! ```text
//! screen=lobby
//! manifest=m-42
//! main: IMAGE promo.png duration=12s
//! right: ERROR loading VIDEO clip.mp4
//! Manifest error: http 502 Bad Gateway
//! ```
//!
//! Registered only when debugging is on; it never feeds anything back to the loops.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::display::Display;
use crate::events::{Event, EventKind};
use crate::screen::ScreenId;
use crate::subscribers::Subscribe;

#[derive(Debug, Default)]
struct Overlay {
    manifest: Option<String>,
    zones: BTreeMap<String, String>,
    error: Option<String>,
}

impl Overlay {
    /// Folds `ev` in. Returns `false` for events that do not change the text.
    fn apply(&mut self, ev: &Event) -> bool {
        let zone = ev.zone_name().to_string();
        let item = ev.item.as_deref().unwrap_or("-");
        let reason = ev.reason.as_deref().unwrap_or("-");

        match ev.kind {
            EventKind::ItemMounted => {
                let line = match ev.delay() {
                    Some(d) => format!("{item} duration={}s", d.as_secs()),
                    None => item.to_string(),
                };
                self.zones.insert(zone, line);
            }
            EventKind::ItemFailed => {
                self.zones.insert(zone, format!("ERROR loading {item}"));
            }
            EventKind::ItemUnsupported => {
                self.zones.insert(zone, reason.to_string());
            }
            EventKind::ZoneEmpty => {
                self.zones.insert(zone, "No playlist items".to_string());
            }
            EventKind::ZoneStopped => {
                self.zones.remove(&zone);
            }
            EventKind::WidgetFailed => {
                self.zones.insert(zone, format!("Widget error: {reason}"));
            }
            EventKind::ManifestApplied => {
                self.manifest = ev.manifest.as_deref().map(str::to_string);
                self.error = None;
            }
            EventKind::ManifestUnchanged => {
                if self.error.take().is_none() {
                    return false;
                }
            }
            EventKind::ManifestFailed => {
                self.error = Some(format!("Manifest error: {reason}"));
            }
            _ => return false,
        }
        true
    }

    fn render(&self, screen: &ScreenId) -> String {
        let mut out = format!("screen={screen}\n");
        let _ = writeln!(out, "manifest={}", self.manifest.as_deref().unwrap_or("-"));
        for (zone, line) in &self.zones {
            let _ = writeln!(out, "{zone}: {line}");
        }
        if let Some(err) = &self.error {
            let _ = writeln!(out, "{err}");
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Debug overlay subscriber.
pub struct DebugSurface {
    display: Arc<dyn Display>,
    screen: ScreenId,
    overlay: Mutex<Overlay>,
}

impl DebugSurface {
    #[must_use]
    pub fn new(display: Arc<dyn Display>, screen: ScreenId) -> Self {
        Self {
            display,
            screen,
            overlay: Mutex::new(Overlay::default()),
        }
    }

    /// Current overlay text.
    pub fn text(&self) -> String {
        self.lock().render(&self.screen)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Overlay> {
        self.overlay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Subscribe for DebugSurface {
    async fn on_event(&self, ev: &Event) {
        let text = {
            let mut overlay = self.lock();
            if !overlay.apply(ev) {
                return;
            }
            overlay.render(&self.screen)
        };
        self.display.show_overlay(&text).await;
    }

    fn name(&self) -> &'static str {
        "DebugSurface"
    }

    fn queue_capacity(&self) -> usize {
        256
    }
}
