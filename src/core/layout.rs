//! # Screen layouts.
//!
//! A [`Layout`] says which zones exist, which manifest playlist feeds each of them,
//! which zones are owned by widget loops instead, and which widget feeds the ticker.
//!
//! ```text
//! single:  zone "stage" ◄── playlist "default"
//! zoned:   zone "main"  ◄── playlist "main"   (12s default)
//!          zone "right" ◄── playlist "right"  (18s default)
//!          ticker       ◄── widget "rss_ticker"
//! ```

use std::collections::HashSet;
use std::time::Duration;

use crate::error::RuntimeError;
use crate::manifest::DEFAULT_PLAYLIST;

/// Ticker widget used by the zoned layout.
pub const DEFAULT_TICKER_WIDGET: &str = "rss_ticker";

/// A manifest-driven zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneSpec {
    pub name: String,
    /// Manifest playlist feeding this zone.
    pub playlist: String,
    /// Display time of items that set none (`None` = global default).
    pub default_duration: Option<Duration>,
}

impl ZoneSpec {
    pub fn new(name: impl Into<String>, playlist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playlist: playlist.into(),
            default_duration: None,
        }
    }

    pub fn with_default_duration(mut self, d: Duration) -> Self {
        self.default_duration = Some(d);
        self
    }
}

/// A zone driven by a widget document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetSpec {
    /// Widget name (`/api/widgets/{name}`).
    pub name: String,
    pub zone: String,
}

impl WidgetSpec {
    pub fn new(name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: zone.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub zones: Vec<ZoneSpec>,
    pub widgets: Vec<WidgetSpec>,
    /// Widget whose `text` lines feed the ticker.
    pub ticker: Option<String>,
}

impl Layout {
    /// One full-screen zone fed by the `playlist.items` manifest shape.
    pub fn single() -> Self {
        Self {
            zones: vec![ZoneSpec::new("stage", DEFAULT_PLAYLIST)],
            widgets: Vec::new(),
            ticker: None,
        }
    }

    /// Main and side zones plus a ticker line.
    pub fn zoned() -> Self {
        Self {
            zones: vec![
                ZoneSpec::new("main", "main").with_default_duration(Duration::from_secs(12)),
                ZoneSpec::new("right", "right").with_default_duration(Duration::from_secs(18)),
            ],
            widgets: Vec::new(),
            ticker: Some(DEFAULT_TICKER_WIDGET.to_string()),
        }
    }

    /// Gives `zone` to a widget loop, taking it away from the manifest.
    pub fn with_widget(mut self, widget: WidgetSpec) -> Self {
        self.zones.retain(|z| z.name != widget.zone);
        self.widgets.push(widget);
        self
    }

    /// Fails if two loops would own the same zone.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let mut seen = HashSet::new();
        let names = self
            .zones
            .iter()
            .map(|z| z.name.as_str())
            .chain(self.widgets.iter().map(|w| w.zone.as_str()));
        for name in names {
            if !seen.insert(name) {
                return Err(RuntimeError::LayoutConflict {
                    zone: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
