//! # RenderTarget adapter.
//!
//! Turns a [`PlaylistItem`] into a [`Surface`], mounts it on the [`Display`] and
//! hands back an owned [`RenderTarget`]. The adapter never fails a mount: problems
//! come back as a "nothing rendered" target plus a [`MediaError`], and the zone
//! decides what to do with them.
//!
//! ## Dispatch
//! ```text
//! Media::Image  { asset }   → Surface::Image  (asset id → {base}/media/{id})
//! Media::Video  { asset }   → Surface::Video  (not looped; completion ends the item)
//! Media::Frame  { url }     → Surface::Frame
//! Media::Widget(card)       → Surface::Card   (+ backdrop, zone theme)
//! Media::Unknown { kind }   → blank target + MediaError::Unsupported
//! missing asset / url       → blank target + MediaError::Load
//! ```
//!
//! ## Teardown
//! `teardown()` detaches the signal link **before** unmounting, so a completion or
//! failure raced against teardown is dropped at the source.

use std::sync::Arc;

use crate::display::Display;
use crate::error::MediaError;
use crate::manifest::{AssetRef, FitMode, Media, PlaylistItem, Theme, WidgetDefaults};
use crate::screen::Endpoints;

use super::signal::{SignalLink, TargetId};
use super::surface::{Backdrop, ElementId, Surface};

/// A mounted item, owned by exactly one zone.
#[derive(Debug)]
pub struct RenderTarget {
    element: Option<ElementId>,
    link: SignalLink,
    label: String,
}

impl RenderTarget {
    pub fn id(&self) -> TargetId {
        self.link.target()
    }

    /// Display element, or `None` for the "nothing rendered" target.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn is_blank(&self) -> bool {
        self.element.is_none()
    }

    /// Label of the item this target shows (`"IMAGE promo.png"`).
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Result of [`Adapter::mount`].
#[derive(Debug)]
pub struct Mount {
    pub target: RenderTarget,
    pub error: Option<MediaError>,
}

/// Per-zone bridge between playlist items and the display.
pub struct Adapter {
    zone: Arc<str>,
    display: Arc<dyn Display>,
    endpoints: Endpoints,
    theme: Theme,
}

impl Adapter {
    pub fn new(zone: Arc<str>, display: Arc<dyn Display>, endpoints: Endpoints) -> Self {
        Self {
            zone,
            display,
            endpoints,
            theme: Theme::default().resolved(),
        }
    }

    /// Theme used for cards mounted from now on.
    pub fn set_theme(&mut self, theme: &Theme) {
        self.theme = theme.resolved();
    }

    fn asset_src(&self, asset: &AssetRef) -> String {
        match asset {
            AssetRef::Id(id) => self.endpoints.media(id).to_string(),
            AssetRef::Url(url) => self.endpoints.resolve(url),
        }
    }

    /// Maps an item onto the surface that shows it.
    pub fn resolve(&self, item: &PlaylistItem) -> Result<Surface, MediaError> {
        let missing = || MediaError::Load {
            asset: item.identity(),
            reason: "item has no asset reference".to_string(),
        };
        let fit = item.fit.unwrap_or_default();

        match &item.media {
            Media::Image { asset } => {
                let asset = asset.as_ref().ok_or_else(missing)?;
                Ok(Surface::Image {
                    src: self.asset_src(asset),
                    fit,
                })
            }
            Media::Video { asset, mute } => {
                let asset = asset.as_ref().ok_or_else(missing)?;
                Ok(Surface::Video {
                    src: self.asset_src(asset),
                    fit,
                    muted: *mute,
                    looped: false,
                })
            }
            Media::Frame { url, .. } => {
                let url = url.as_deref().filter(|u| !u.is_empty()).ok_or_else(missing)?;
                Ok(Surface::Frame {
                    src: self.endpoints.resolve(url),
                })
            }
            Media::Widget(card) => {
                let backdrop = card.media_url.as_deref().filter(|u| !u.is_empty()).map(|u| {
                    let src = self.endpoints.resolve(u);
                    if card.has_video_backdrop() {
                        Backdrop::Video(src)
                    } else {
                        Backdrop::Image(src)
                    }
                });
                let mut card = card.clone();
                card.bullets = card.visible_bullets(&WidgetDefaults::default()).to_vec();
                Ok(Surface::Card {
                    card,
                    theme: self.theme.clone(),
                    fit: item.fit.unwrap_or(FitMode::Cover),
                    backdrop,
                })
            }
            Media::Unknown { kind } => Err(MediaError::Unsupported { kind: kind.clone() }),
        }
    }

    /// Mounts `item`, wiring its signals through `link`.
    ///
    /// The item's background colour is applied to the zone first.
    pub async fn mount(&self, item: &PlaylistItem, link: SignalLink) -> Mount {
        self.display
            .set_background(&self.zone, item.background.as_deref())
            .await;

        let label = item.label();
        let mounted = match self.resolve(item) {
            Ok(surface) => self.display.mount(&self.zone, &surface, link.clone()).await,
            Err(err) => Err(err),
        };

        match mounted {
            Ok(element) => Mount {
                target: RenderTarget {
                    element: Some(element),
                    link,
                    label,
                },
                error: None,
            },
            Err(err) => Mount {
                target: RenderTarget {
                    element: None,
                    link,
                    label,
                },
                error: Some(err),
            },
        }
    }

    /// Detaches the target's signals, then removes its element.
    pub async fn teardown(&self, target: RenderTarget) {
        target.link.detach();
        if let Some(element) = target.element {
            self.display.unmount(&self.zone, element).await;
        }
    }

    /// Blanks the whole zone.
    pub async fn clear(&self) {
        self.display.set_background(&self.zone, None).await;
        self.display.clear(&self.zone).await;
    }
}
