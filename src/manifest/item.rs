//! # Playlist items.
//!
//! A [`PlaylistItem`] is one rotation entry. Its [`Media`] is a tagged variant with
//! one case per kind of surface; unknown type tags are kept (not rejected) so the
//! zone can skip them with a diagnostic instead of failing the whole manifest.
//!
//! ## Type tags
//! ```text
//! "image"                                  → Media::Image
//! "video"                                  → Media::Video
//! "youtube" | "instagram" | "iframe"
//!   | "frame" | "web"                      → Media::Frame
//! "spa_card" | "card" | "widget"           → Media::Widget
//! anything else, or no tag                 → Media::Unknown
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use super::lenient;
use super::widget::Card;

/// How a surface fills its zone. Anything other than `"cover"` means contain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    Cover,
    #[default]
    Contain,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
        }
    }
}

impl<'de> Deserialize<'de> for FitMode {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(if raw.eq_ignore_ascii_case("cover") {
            FitMode::Cover
        } else {
            FitMode::Contain
        })
    }
}

/// Where the bytes of an image or video come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetRef {
    /// Served by the manifest host under `/media/{id}`.
    Id(String),
    /// Fully-qualified (or host-relative) URL used verbatim.
    Url(String),
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Id(id) => f.write_str(id),
            AssetRef::Url(url) => f.write_str(url),
        }
    }
}

/// Kind-specific payload of a playlist item.
#[derive(Clone, Debug, PartialEq)]
pub enum Media {
    Image {
        asset: Option<AssetRef>,
    },
    /// Self-terminating: the item ends when playback ends.
    Video {
        asset: Option<AssetRef>,
        mute: bool,
    },
    /// Embedded external page (`provider` is the original type tag).
    Frame {
        url: Option<String>,
        provider: String,
    },
    Widget(Card),
    Unknown {
        kind: String,
    },
}

/// One entry of a zone's rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaylistItem {
    pub media: Media,
    /// Display time for self-timed kinds; `None` means the zone default.
    pub duration: Option<Duration>,
    pub fit: Option<FitMode>,
    /// Zone background colour while this item is shown.
    pub background: Option<String>,
}

impl PlaylistItem {
    fn with_media(media: Media) -> Self {
        Self {
            media,
            duration: None,
            fit: None,
            background: None,
        }
    }

    /// Image served from `/media/{asset_id}`.
    pub fn image(asset_id: impl Into<String>) -> Self {
        Self::with_media(Media::Image {
            asset: Some(AssetRef::Id(asset_id.into())),
        })
    }

    /// Video served from `/media/{asset_id}`.
    pub fn video(asset_id: impl Into<String>) -> Self {
        Self::with_media(Media::Video {
            asset: Some(AssetRef::Id(asset_id.into())),
            mute: false,
        })
    }

    /// Embedded page.
    pub fn frame(url: impl Into<String>) -> Self {
        Self::with_media(Media::Frame {
            url: Some(url.into()),
            provider: "iframe".to_string(),
        })
    }

    /// Card widget.
    pub fn card(card: Card) -> Self {
        let duration = card.duration_sec;
        let fit = card.fit;
        Self {
            duration,
            fit,
            ..Self::with_media(Media::Widget(card))
        }
    }

    /// Item with an unrecognised type tag.
    pub fn unknown(kind: impl Into<String>) -> Self {
        Self::with_media(Media::Unknown { kind: kind.into() })
    }

    /// Returns a copy with an explicit display time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns a copy with a background colour.
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// `true` for kinds that signal their own completion (video).
    pub fn is_self_terminating(&self) -> bool {
        matches!(self.media, Media::Video { .. })
    }

    /// Short upper-case kind name used in logs and the overlay.
    pub fn kind_label(&self) -> &'static str {
        match self.media {
            Media::Image { .. } => "IMAGE",
            Media::Video { .. } => "VIDEO",
            Media::Frame { .. } => "FRAME",
            Media::Widget(_) => "CARD",
            Media::Unknown { .. } => "UNKNOWN",
        }
    }

    /// Identity of the item for diagnostics: asset, URL, title or raw tag.
    pub fn identity(&self) -> String {
        match &self.media {
            Media::Image { asset } | Media::Video { asset, .. } => asset
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "<no asset>".to_string()),
            Media::Frame { url, provider } => url.clone().unwrap_or_else(|| provider.clone()),
            Media::Widget(card) => card
                .title
                .clone()
                .or_else(|| card.media_url.clone())
                .unwrap_or_else(|| "<card>".to_string()),
            Media::Unknown { kind } => kind.clone(),
        }
    }

    /// `"IMAGE promo.png"` style label.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind_label(), self.identity())
    }
}

/// Flat wire shape shared by every item type.
#[derive(Deserialize)]
struct RawItem {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    asset_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    mute: Option<bool>,
    #[serde(default)]
    background: Option<String>,
    /// Card fields, plus `fit` and `duration_sec` shared by every kind.
    #[serde(flatten)]
    card: Card,
}

impl RawItem {
    fn asset(&self) -> Option<AssetRef> {
        match (&self.asset_id, &self.url) {
            (Some(id), _) if !id.is_empty() => Some(AssetRef::Id(id.clone())),
            (_, Some(url)) if !url.is_empty() => Some(AssetRef::Url(url.clone())),
            _ => None,
        }
    }
}

impl From<RawItem> for PlaylistItem {
    fn from(raw: RawItem) -> Self {
        let kind = raw.kind.clone().unwrap_or_default();
        let media = match kind.to_ascii_lowercase().as_str() {
            "image" => Media::Image { asset: raw.asset() },
            "video" => Media::Video {
                asset: raw.asset(),
                mute: raw.mute.unwrap_or(false),
            },
            "youtube" | "instagram" | "iframe" | "frame" | "web" => Media::Frame {
                url: raw.url.clone().filter(|u| !u.is_empty()),
                provider: kind.clone(),
            },
            "spa_card" | "card" | "widget" => Media::Widget(raw.card.clone()),
            _ => Media::Unknown { kind: kind.clone() },
        };
        PlaylistItem {
            media,
            duration: raw.card.duration_sec,
            fit: raw.card.fit,
            background: raw.background,
        }
    }
}

impl<'de> Deserialize<'de> for PlaylistItem {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        RawItem::deserialize(de).map(PlaylistItem::from)
    }
}
