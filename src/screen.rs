//! # Screen address and endpoint layout.
//!
//! A display is started with the URL it would be opened at in a browser, e.g.
//! `http://signage.local:8000/player-zones/lobby%201?debug=1`. From it we derive:
//!
//! ```text
//! origin     http://signage.local:8000        → base for every request
//! last seg   "lobby 1"                        → ScreenId (decoded once)
//! ?debug=1                                    → debug overlay on
//! ```
//!
//! [`Endpoints`] then builds request URLs, encoding ids as single path segments:
//! `/api/manifest/lobby%201`, `/api/widgets/spa_cards`, `/media/a%20b.png`.

use std::fmt;

use url::Url;

use crate::error::RuntimeError;

/// Identity of one physical screen (decoded form).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a player learns from its display URL.
#[derive(Clone, Debug)]
pub struct ScreenAddress {
    endpoints: Endpoints,
    screen: ScreenId,
    debug: bool,
}

impl ScreenAddress {
    /// Parses a display URL.
    ///
    /// Fails on anything that is not an absolute `http(s)` URL, and on URLs whose
    /// last path segment is empty.
    pub fn parse(display_url: &str) -> Result<Self, RuntimeError> {
        let invalid = |reason: String| RuntimeError::InvalidDisplayUrl {
            url: display_url.to_string(),
            reason,
        };

        let url = Url::parse(display_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }

        let raw = url
            .path_segments()
            .and_then(|mut segs| segs.next_back())
            .unwrap_or_default();
        let decoded = urlencoding::decode(raw).map_err(|e| invalid(e.to_string()))?;
        let id = decoded.trim();
        if id.is_empty() {
            return Err(RuntimeError::EmptyScreenId {
                url: display_url.to_string(),
            });
        }

        let debug = url
            .query_pairs()
            .any(|(k, v)| k == "debug" && v == "1");

        let mut base = url.clone();
        base.set_query(None);
        base.set_fragment(None);
        base.set_path("/");

        Ok(Self {
            endpoints: Endpoints { base },
            screen: ScreenId::new(id),
            debug,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn screen(&self) -> &ScreenId {
        &self.screen
    }

    /// Whether the display URL asked for the debug overlay.
    pub fn debug(&self) -> bool {
        self.debug
    }
}

/// Request URLs relative to the manifest host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Endpoints rooted at `base` (its path, query and fragment are ignored).
    pub fn new(mut base: Url) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        base.set_path("/");
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn at(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url
    }

    /// `GET /api/manifest/{screen}`.
    pub fn manifest(&self, screen: &ScreenId) -> Url {
        self.at(&["api", "manifest", screen.as_str()])
    }

    /// `GET /api/widgets/{name}`.
    pub fn widget(&self, name: &str) -> Url {
        self.at(&["api", "widgets", name])
    }

    /// `/media/{asset_id}`.
    pub fn media(&self, asset_id: &str) -> Url {
        self.at(&["media", asset_id])
    }

    /// Resolves a manifest-supplied href (`/media/x.jpg`, `https://...`) against the host.
    /// Unparsable hrefs are returned unchanged.
    pub fn resolve(&self, href: &str) -> String {
        self.base
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string())
    }
}
