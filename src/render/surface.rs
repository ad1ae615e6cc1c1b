//! Concrete things a display can show.

use std::fmt;

use crate::manifest::{Card, FitMode, Theme};

/// Display-assigned handle of a mounted element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el{}", self.0)
    }
}

/// Backdrop behind a card.
#[derive(Clone, Debug, PartialEq)]
pub enum Backdrop {
    Image(String),
    /// Muted, looping.
    Video(String),
}

/// A resolved, ready-to-mount description of one playlist item.
///
/// All sources are absolute URLs.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    Image {
        src: String,
        fit: FitMode,
    },
    Video {
        src: String,
        fit: FitMode,
        muted: bool,
        looped: bool,
    },
    Frame {
        src: String,
    },
    Card {
        card: Card,
        theme: Theme,
        fit: FitMode,
        backdrop: Option<Backdrop>,
    },
}

impl Surface {
    pub fn kind(&self) -> &'static str {
        match self {
            Surface::Image { .. } => "image",
            Surface::Video { .. } => "video",
            Surface::Frame { .. } => "frame",
            Surface::Card { .. } => "card",
        }
    }

    /// URL the display has to fetch for this surface, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            Surface::Image { src, .. } | Surface::Video { src, .. } | Surface::Frame { src } => {
                Some(src)
            }
            Surface::Card { backdrop, .. } => backdrop.as_ref().map(|b| match b {
                Backdrop::Image(src) | Backdrop::Video(src) => src.as_str(),
            }),
        }
    }
}
