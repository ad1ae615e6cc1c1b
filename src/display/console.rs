//! # ConsoleDisplay: headless display backend.
//!
//! Logs what every zone shows and behaves like a browser would where it matters to
//! the scheduler:
//!
//! ```text
//! Image  → GET src in the background; non-2xx or transport error → link.failed()
//! Video  → GET src; failure → link.failed(), else sleep(video_length) → link.ended()
//! Frame  → nothing to probe (embedded pages never report errors)
//! Card   → nothing to probe (a broken backdrop is just not painted)
//! ```
//!
//! Each element owns at most one background task; `unmount`/`clear` abort it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Display;
use crate::error::MediaError;
use crate::manifest::Header;
use crate::render::{ElementId, SignalLink, Surface};

struct Element {
    zone: String,
    task: Option<JoinHandle<()>>,
}

impl Element {
    fn abort(self) {
        if let Some(task) = self.task {
            task.abort();
        }
    }
}

/// Headless display that writes to the log.
pub struct ConsoleDisplay {
    client: reqwest::Client,
    video_length: Duration,
    next_id: AtomicU64,
    elements: Mutex<HashMap<ElementId, Element>>,
}

impl ConsoleDisplay {
    /// Simulated playback length used when nothing better is known.
    pub const DEFAULT_VIDEO_LENGTH: Duration = Duration::from_secs(30);

    pub fn new(video_length: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), video_length)
    }

    pub fn with_client(client: reqwest::Client, video_length: Duration) -> Self {
        Self {
            client,
            video_length,
            next_id: AtomicU64::new(1),
            elements: Mutex::new(HashMap::new()),
        }
    }

    /// Number of elements currently mounted in `zone`.
    pub fn mounted(&self, zone: &str) -> usize {
        self.lock().values().filter(|e| e.zone == zone).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ElementId, Element>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_probe(&self, src: &str, link: SignalLink, play_for: Option<Duration>) -> JoinHandle<()> {
        let client = self.client.clone();
        let src = src.to_string();
        tokio::spawn(async move {
            let run = async {
                if let Err(reason) = probe(&client, &src).await {
                    link.failed(MediaError::Load { asset: src, reason });
                    return;
                }
                if let Some(length) = play_for {
                    tokio::time::sleep(length).await;
                    link.ended();
                }
            };
            tokio::select! {
                _ = run => {}
                _ = link.detached() => {}
            }
        })
    }
}

async fn probe(client: &reqwest::Client, src: &str) -> Result<(), String> {
    let resp = client.get(src).send().await.map_err(|e| e.to_string())?;
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(status.to_string())
    }
}

#[async_trait]
impl Display for ConsoleDisplay {
    async fn mount(
        &self,
        zone: &str,
        surface: &Surface,
        link: SignalLink,
    ) -> Result<ElementId, MediaError> {
        let id = ElementId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        let task = match surface {
            Surface::Image { src, fit } => {
                info!(zone, element = %id, fit = fit.as_str(), src = %src, "show image");
                Some(self.spawn_probe(src, link, None))
            }
            Surface::Video { src, muted, .. } => {
                info!(zone, element = %id, muted, src = %src, "play video");
                Some(self.spawn_probe(src, link, Some(self.video_length)))
            }
            Surface::Frame { src } => {
                info!(zone, element = %id, src = %src, "embed frame");
                None
            }
            Surface::Card { card, backdrop, .. } => {
                info!(
                    zone,
                    element = %id,
                    title = card.title.as_deref().unwrap_or(""),
                    bullets = card.bullets.len(),
                    backdrop = ?backdrop,
                    "show card"
                );
                None
            }
        };

        self.lock().insert(
            id,
            Element {
                zone: zone.to_string(),
                task,
            },
        );
        Ok(id)
    }

    async fn unmount(&self, zone: &str, element: ElementId) {
        if let Some(el) = self.lock().remove(&element) {
            debug!(zone, element = %element, "unmount");
            el.abort();
        }
    }

    async fn clear(&self, zone: &str) {
        let removed: Vec<Element> = {
            let mut map = self.lock();
            let ids: Vec<ElementId> = map
                .iter()
                .filter(|(_, e)| e.zone == zone)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter().filter_map(|id| map.remove(&id)).collect()
        };
        debug!(zone, removed = removed.len(), "clear");
        removed.into_iter().for_each(Element::abort);
    }

    async fn set_background(&self, zone: &str, color: Option<&str>) {
        if let Some(color) = color {
            debug!(zone, color, "background");
        }
    }

    async fn set_header(&self, header: &Header) {
        info!(
            title = %header.title,
            subtitle = %header.subtitle,
            phone = header.phone.as_deref().unwrap_or(""),
            logo = header.logo_url.as_deref().unwrap_or(""),
            "header"
        );
    }

    async fn set_ticker(&self, text: &str) {
        info!(ticker = text, "ticker");
    }

    async fn show_overlay(&self, text: &str) {
        info!(target: "screenvisor::overlay", "\n{text}");
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FitMode;
    use crate::render::{TargetId, TargetSignal};
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn missing_asset_reports_failure_through_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let display = ConsoleDisplay::new(Duration::from_secs(1));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let link = SignalLink::new(TargetId::new(1), tx);
        let surface = Surface::Image {
            src: format!("{}/media/gone.png", server.uri()),
            fit: FitMode::Cover,
        };

        display.mount("main", &surface, link).await.unwrap();
        assert_eq!(display.mounted("main"), 1);

        let signal = rx.recv().await.unwrap();
        assert!(matches!(
            signal,
            TargetSignal { kind: crate::render::SignalKind::Failed(MediaError::Load { .. }), .. }
        ));
    }

    #[tokio::test]
    async fn video_ends_after_simulated_length() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let display = ConsoleDisplay::new(Duration::from_millis(20));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let link = SignalLink::new(TargetId::new(3), tx);
        let surface = Surface::Video {
            src: format!("{}/media/clip.mp4", server.uri()),
            fit: FitMode::Contain,
            muted: true,
            looped: false,
        };

        display.mount("main", &surface, link).await.unwrap();
        assert_eq!(rx.recv().await, Some(TargetSignal::ended(TargetId::new(3))));
    }

    #[tokio::test]
    async fn clear_removes_only_that_zone() {
        let display = ConsoleDisplay::new(Duration::from_secs(1));
        let (tx, _rx) = mpsc::unbounded_channel();
        let frame = Surface::Frame {
            src: "https://example.com".into(),
        };
        display
            .mount("main", &frame, SignalLink::new(TargetId::new(1), tx.clone()))
            .await
            .unwrap();
        display
            .mount("right", &frame, SignalLink::new(TargetId::new(2), tx))
            .await
            .unwrap();

        display.clear("main").await;
        assert_eq!(display.mounted("main"), 0);
        assert_eq!(display.mounted("right"), 1);
    }
}
