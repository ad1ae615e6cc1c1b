//! Wire model: manifests, playlist items and widget documents.
//!
//! ## Contents
//! - [`Manifest`], [`Header`] the per-screen content descriptor
//! - [`PlaylistItem`], [`Media`], [`AssetRef`], [`FitMode`] one rotation entry
//! - [`Card`], [`WidgetData`], [`Theme`], [`WidgetDefaults`] widget payloads
//!
//! Everything here is immutable once parsed. Playlists are shared as `Arc<[PlaylistItem]>`
//! so a manifest apply hands the same slice to a zone without copying.

mod document;
mod item;
mod lenient;
mod seconds;
mod widget;

pub use document::{DEFAULT_PLAYLIST, DocumentError, Header, Manifest};
pub use item::{AssetRef, FitMode, Media, PlaylistItem};
pub use widget::{Card, Theme, WidgetData, WidgetDefaults};
