//! Widget payloads: service cards, ticker lines, theme and defaults.
//!
//! The same [`Card`] shape is used for cards embedded in a manifest playlist
//! (`"type": "spa_card"`) and for the `cards`/`items` array of a widget document.

use std::time::Duration;

use serde::Deserialize;

use super::item::FitMode;
use super::{lenient, seconds};

const DEFAULT_CARD_DURATION: Duration = Duration::from_secs(12);
const DEFAULT_MAX_BULLETS: usize = 6;

/// One data-driven card (or ticker line, which only uses `text`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Card {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tag: Option<String>,
    /// Ticker line text.
    pub text: Option<String>,
    #[serde(alias = "items")]
    pub bullets: Vec<String>,
    /// Backdrop media; `.mp4` URLs are shown as a muted looping video.
    #[serde(alias = "bg")]
    pub media_url: Option<String>,
    pub fit: Option<FitMode>,
    #[serde(alias = "duration", deserialize_with = "seconds::deserialize")]
    pub duration_sec: Option<Duration>,
    #[serde(alias = "maxBullets", deserialize_with = "lenient::count")]
    pub max_bullets: Option<usize>,
}

impl Card {
    /// Whether the backdrop should be played as video rather than shown as an image.
    pub fn has_video_backdrop(&self) -> bool {
        self.media_url.as_deref().is_some_and(|url| {
            let u = url.to_ascii_lowercase();
            u.ends_with(".mp4") || u.contains(".mp4?")
        })
    }

    /// Bullets truncated to the card limit, then the widget limit, then 6.
    pub fn visible_bullets(&self, defaults: &WidgetDefaults) -> &[String] {
        let max = self
            .max_bullets
            .or(defaults.max_bullets)
            .unwrap_or(DEFAULT_MAX_BULLETS);
        &self.bullets[..self.bullets.len().min(max)]
    }
}

/// Colour theme of a card widget. Unset entries fall back to [`Theme::resolved`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub accent: Option<String>,
    #[serde(alias = "titleColor")]
    pub title_color: Option<String>,
    #[serde(alias = "textColor")]
    pub text_color: Option<String>,
    #[serde(alias = "mutedColor")]
    pub muted_color: Option<String>,
    #[serde(alias = "cardBg")]
    pub card_bg: Option<String>,
}

impl Theme {
    /// Returns a copy with every colour filled in.
    pub fn resolved(&self) -> Theme {
        fn or(v: &Option<String>, d: &str) -> Option<String> {
            Some(v.clone().unwrap_or_else(|| d.to_string()))
        }
        Theme {
            accent: or(&self.accent, "#2cc6c4"),
            title_color: or(&self.title_color, "#ffffff"),
            text_color: or(&self.text_color, "rgba(255,255,255,0.88)"),
            muted_color: or(&self.muted_color, "rgba(255,255,255,0.70)"),
            card_bg: or(&self.card_bg, "#0b0b0b"),
        }
    }
}

/// Widget-wide defaults applied to cards that do not set their own.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetDefaults {
    #[serde(alias = "duration", deserialize_with = "seconds::deserialize")]
    pub duration_sec: Option<Duration>,
    pub fit: Option<FitMode>,
    #[serde(alias = "maxBullets", deserialize_with = "lenient::count")]
    pub max_bullets: Option<usize>,
}

impl WidgetDefaults {
    /// Display time of `card`: card value, then widget default, then 12s.
    pub fn duration_for(&self, card: &Card) -> Duration {
        card.duration_sec
            .or(self.duration_sec)
            .unwrap_or(DEFAULT_CARD_DURATION)
    }

    /// Fit of `card`: card value, then widget default, then cover.
    pub fn fit_for(&self, card: &Card) -> FitMode {
        card.fit.or(self.fit).unwrap_or(FitMode::Cover)
    }
}

/// Body of `GET /api/widgets/{name}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetData {
    #[serde(alias = "items")]
    pub cards: Vec<Card>,
    pub theme: Theme,
    pub defaults: WidgetDefaults,
}

impl WidgetData {
    /// Non-empty ticker lines, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.cards
            .iter()
            .filter_map(|c| c.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_card_widget_document() {
        let data: WidgetData = serde_json::from_str(
            r##"{
                "cards": [
                    {"title": "Injectables", "bullets": ["A","B","C"], "media_url": "/media/inj.MP4",
                     "maxBullets": 2, "duration_sec": 9},
                    {"title": "PRP", "media_url": "/media/prp.jpg"}
                ],
                "theme": {"accent": "#ff0000"},
                "defaults": {"duration_sec": 15, "fit": "contain", "maxBullets": 4}
            }"##,
        )
        .unwrap();

        let inj = &data.cards[0];
        assert!(inj.has_video_backdrop());
        assert_eq!(inj.visible_bullets(&data.defaults), ["A", "B"]);
        assert_eq!(data.defaults.duration_for(inj), Duration::from_secs(9));

        let prp = &data.cards[1];
        assert!(!prp.has_video_backdrop());
        assert_eq!(data.defaults.duration_for(prp), Duration::from_secs(15));
        assert_eq!(data.defaults.fit_for(prp), FitMode::Contain);

        let theme = data.theme.resolved();
        assert_eq!(theme.accent.as_deref(), Some("#ff0000"));
        assert_eq!(theme.card_bg.as_deref(), Some("#0b0b0b"));
    }

    #[test]
    fn ticker_lines_skip_blank_text() {
        let data: WidgetData = serde_json::from_str(
            r#"{"ok": true, "items": [{"type":"headline","text":" Open late "}, {"text": ""}, {"type":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(data.lines().collect::<Vec<_>>(), ["Open late"]);
    }

    #[test]
    fn empty_document_uses_builtin_defaults() {
        let data: WidgetData = serde_json::from_str("{}").unwrap();
        let card = Card::default();
        assert_eq!(data.defaults.duration_for(&card), Duration::from_secs(12));
        assert_eq!(data.defaults.fit_for(&card), FitMode::Cover);
        assert!(card.visible_bullets(&data.defaults).is_empty());
    }
}
