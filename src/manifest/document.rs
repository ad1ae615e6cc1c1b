//! # Manifest document.
//!
//! Two wire shapes are accepted and normalised into one [`Manifest`]:
//!
//! ```text
//! single zone:  {"manifest_id": "...", "force_reload": false,
//!                "playlist": {"items": [...]}}            → playlist "default"
//!
//! zoned:        {"ok": true, "manifest_id": "...",
//!                "main_items": [...], "right_items": [...],
//!                "header_title": "...", ...}              → playlists "main", "right", ...
//! ```
//!
//! A document with `"ok": false` is rejected with its `error` text.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::item::PlaylistItem;
use super::lenient::truthy;

/// Name given to the `playlist.items` array of the single-zone shape.
pub const DEFAULT_PLAYLIST: &str = "default";

const ITEMS_SUFFIX: &str = "_items";
const DEFAULT_TITLE: &str = "Prestige";

/// Why a manifest body could not be used.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest rejected by server: {0}")]
    Rejected(String),
}

/// Header band shown above the zones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: String::new(),
            phone: None,
            logo_url: None,
        }
    }
}

/// Versioned content descriptor for one screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Manifest {
    pub manifest_id: Option<String>,
    pub force_reload: bool,
    pub layout_id: Option<String>,
    pub header: Header,
    pub playlists: BTreeMap<String, Arc<[PlaylistItem]>>,
}

#[derive(Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    manifest_id: Value,
    #[serde(default)]
    force_reload: Value,
    #[serde(default)]
    layout_id: Option<String>,
    #[serde(default)]
    playlist: Option<RawPlaylist>,
    #[serde(default)]
    header_title: Option<String>,
    #[serde(default)]
    header_subtitle: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    logo_url: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, Value>,
}

fn identity(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl Manifest {
    /// Parses a manifest body in either wire shape.
    pub fn parse(body: &[u8]) -> Result<Manifest, DocumentError> {
        let raw: RawManifest = serde_json::from_slice(body)?;
        if raw.ok == Some(false) {
            return Err(DocumentError::Rejected(
                raw.error.unwrap_or_else(|| "manifest failed".to_string()),
            ));
        }

        let mut playlists = BTreeMap::new();
        if let Some(playlist) = raw.playlist {
            playlists.insert(DEFAULT_PLAYLIST.to_string(), Arc::from(playlist.items));
        }
        for (key, value) in raw.rest {
            let Some(name) = key.strip_suffix(ITEMS_SUFFIX) else {
                continue;
            };
            if name.is_empty() || value.is_null() {
                continue;
            }
            let items: Vec<PlaylistItem> = serde_json::from_value(value)?;
            playlists.insert(name.to_string(), Arc::from(items));
        }

        Ok(Manifest {
            manifest_id: identity(raw.manifest_id),
            force_reload: truthy(&raw.force_reload),
            layout_id: raw.layout_id,
            header: Header {
                title: raw
                    .header_title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                subtitle: raw.header_subtitle.unwrap_or_default(),
                phone: raw.phone.filter(|p| !p.is_empty()),
                logo_url: raw.logo_url.filter(|u| !u.is_empty()),
            },
            playlists,
        })
    }

    /// Items of the named playlist; a missing playlist is an empty one.
    pub fn playlist(&self, name: &str) -> Arc<[PlaylistItem]> {
        self.playlists
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Id used in logs; `"-"` when the server sent none.
    pub fn display_id(&self) -> &str {
        self.manifest_id.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Media;

    #[test]
    fn single_zone_shape() {
        let m = Manifest::parse(
            br#"{"manifest_id":"m-1","force_reload":false,
                 "playlist":{"items":[{"type":"image","asset_id":"a.png"},{"type":"video","asset_id":"b.mp4"}]}}"#,
        )
        .unwrap();
        assert_eq!(m.manifest_id.as_deref(), Some("m-1"));
        assert!(!m.force_reload);
        assert_eq!(m.playlist(DEFAULT_PLAYLIST).len(), 2);
        assert!(m.playlist("main").is_empty());
        assert_eq!(m.header.title, "Prestige");
    }

    #[test]
    fn zoned_shape_collects_every_items_key() {
        let m = Manifest::parse(
            br#"{"ok":true,"manifest_id":"1700000000-1234","layout_id":"layout-horizontal_4zone_v1",
                 "header_title":"Prestige MedSpa","header_subtitle":"Main St","phone":"555-0100",
                 "logo_url":"/media/logo.jpg",
                 "main_items":[{"type":"spa_card","title":"PRP","items":["PRP Facial"]}],
                 "right_items":[{"type":"youtube","duration":18,"url":"https://www.youtube.com/embed"}],
                 "footer_items":[{"type":"rss_ticker","duration":9999}]}"#,
        )
        .unwrap();
        assert_eq!(
            m.playlists.keys().map(String::as_str).collect::<Vec<_>>(),
            ["footer", "main", "right"]
        );
        assert!(matches!(m.playlist("main")[0].media, Media::Widget(_)));
        assert_eq!(m.header.subtitle, "Main St");
        assert_eq!(m.header.phone.as_deref(), Some("555-0100"));
        assert_eq!(m.layout_id.as_deref(), Some("layout-horizontal_4zone_v1"));
    }

    #[test]
    fn rejected_document_carries_server_error() {
        let err = Manifest::parse(br#"{"ok":false,"error":"Missing JSON file: screens.json"}"#)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Rejected(msg) if msg.contains("screens.json")));
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        assert!(matches!(
            Manifest::parse(b"<html>502</html>"),
            Err(DocumentError::Json(_))
        ));
        assert!(matches!(
            Manifest::parse(br#"{"main_items": 3}"#),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn loosely_typed_item_fields_do_not_reject_the_document() {
        let m = Manifest::parse(
            br#"{"manifest_id":"m-2",
                 "main_items":[{"type":"video","asset_id":"b.mp4","mute":"true"},
                               {"type":"spa_card","title":"PRP","maxBullets":-1,
                                "items":["a","b","c","d","e","f","g"]}]}"#,
        )
        .unwrap();
        let main = m.playlist("main");
        assert!(matches!(main[0].media, Media::Video { mute: true, .. }));
        match &main[1].media {
            Media::Widget(card) => {
                assert_eq!(card.max_bullets, None);
                assert_eq!(card.visible_bullets(&Default::default()).len(), 6);
            }
            other => panic!("unexpected media {other:?}"),
        }
    }

    #[test]
    fn numeric_ids_and_truthy_reload_markers() {
        let m = Manifest::parse(br#"{"manifest_id":42,"force_reload":1}"#).unwrap();
        assert_eq!(m.manifest_id.as_deref(), Some("42"));
        assert!(m.force_reload);
        assert!(m.playlists.is_empty());

        let m = Manifest::parse(br#"{"manifest_id":""}"#).unwrap();
        assert_eq!(m.display_id(), "-");
    }
}
