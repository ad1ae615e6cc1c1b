#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use screenvisor::{
    Bus, ContentSource, Display, ElementId, Endpoints, Event, EventKind, FetchError, Header,
    Manifest, MediaError, ScreenAddress, ScreenId, SignalLink, Surface, TargetId, TimingPolicy,
    WidgetData, ZoneLoop,
};
use tokio::sync::broadcast;

pub const BASE: &str = "http://signage.test/player/lobby";

pub fn endpoints() -> Endpoints {
    ScreenAddress::parse(BASE)
        .expect("test url")
        .endpoints()
        .clone()
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    live: HashMap<String, Vec<ElementId>>,
    max_live: HashMap<String, usize>,
    mounts: Vec<(String, Surface)>,
    links: Vec<SignalLink>,
    header: Option<Header>,
    ticker: Option<String>,
    overlay: Option<String>,
}

/// In-memory display that records every call.
///
/// Sources containing one of `failing` are rejected at mount time.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    state: Mutex<State>,
    failing: Vec<String>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(patterns: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::default(),
            failing: patterns.iter().map(|p| p.to_string()).collect(),
        })
    }

    pub fn live(&self, zone: &str) -> usize {
        self.state.lock().unwrap().live.get(zone).map_or(0, Vec::len)
    }

    pub fn max_live(&self, zone: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .max_live
            .get(zone)
            .copied()
            .unwrap_or(0)
    }

    /// Sources mounted in `zone`, oldest first.
    pub fn mounted(&self, zone: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .mounts
            .iter()
            .filter(|(z, _)| z == zone)
            .map(|(_, s)| s.source().unwrap_or(s.kind()).to_string())
            .collect()
    }

    pub fn mount_count(&self, zone: &str) -> usize {
        self.mounted(zone).len()
    }

    /// Link handed over with the most recent mount.
    pub fn last_link(&self) -> SignalLink {
        self.state
            .lock()
            .unwrap()
            .links
            .last()
            .cloned()
            .expect("nothing mounted")
    }

    pub fn link(&self, target: TargetId) -> SignalLink {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .find(|l| l.target() == target)
            .cloned()
            .expect("unknown target")
    }

    pub fn header(&self) -> Option<Header> {
        self.state.lock().unwrap().header.clone()
    }

    pub fn ticker(&self) -> Option<String> {
        self.state.lock().unwrap().ticker.clone()
    }

    pub fn overlay(&self) -> Option<String> {
        self.state.lock().unwrap().overlay.clone()
    }
}

#[async_trait]
impl Display for RecordingDisplay {
    async fn mount(
        &self,
        zone: &str,
        surface: &Surface,
        link: SignalLink,
    ) -> Result<ElementId, MediaError> {
        let mut st = self.state.lock().unwrap();
        st.links.push(link);
        st.mounts.push((zone.to_string(), surface.clone()));

        let src = surface.source().unwrap_or_default();
        if self.failing.iter().any(|p| src.contains(p.as_str())) {
            return Err(MediaError::Load {
                asset: src.to_string(),
                reason: "404 Not Found".into(),
            });
        }

        st.next_id += 1;
        let id = ElementId::new(st.next_id);
        let live = st.live.entry(zone.to_string()).or_default();
        live.push(id);
        let n = live.len();
        let max = st.max_live.entry(zone.to_string()).or_default();
        *max = (*max).max(n);
        Ok(id)
    }

    async fn unmount(&self, zone: &str, element: ElementId) {
        let mut st = self.state.lock().unwrap();
        if let Some(live) = st.live.get_mut(zone) {
            live.retain(|e| *e != element);
        }
    }

    async fn clear(&self, zone: &str) {
        self.state.lock().unwrap().live.remove(zone);
    }

    async fn set_background(&self, _zone: &str, _color: Option<&str>) {}

    async fn set_header(&self, header: &Header) {
        self.state.lock().unwrap().header = Some(header.clone());
    }

    async fn set_ticker(&self, text: &str) {
        self.state.lock().unwrap().ticker = Some(text.to_string());
    }

    async fn show_overlay(&self, text: &str) {
        self.state.lock().unwrap().overlay = Some(text.to_string());
    }
}

/// Content source replaying queued responses.
///
/// When a queue runs dry the last response is repeated.
#[derive(Default)]
pub struct ScriptedSource {
    manifests: Mutex<VecDeque<Result<Manifest, FetchError>>>,
    last_manifest: Mutex<Option<Result<Manifest, FetchError>>>,
    widgets: Mutex<HashMap<String, VecDeque<Result<WidgetData, FetchError>>>>,
    last_widget: Mutex<HashMap<String, Result<WidgetData, FetchError>>>,
    manifest_calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_manifest(&self, json: &str) {
        let manifest = Manifest::parse(json.as_bytes()).expect("test manifest");
        self.manifests.lock().unwrap().push_back(Ok(manifest));
    }

    pub fn push_manifest_error(&self, err: FetchError) {
        self.manifests.lock().unwrap().push_back(Err(err));
    }

    pub fn push_widget(&self, name: &str, json: &str) {
        let data: WidgetData = serde_json::from_str(json).expect("test widget");
        self.widgets
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Ok(data));
    }

    pub fn push_widget_error(&self, name: &str, err: FetchError) {
        self.widgets
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Err(err));
    }

    pub fn manifest_calls(&self) -> usize {
        *self.manifest_calls.lock().unwrap()
    }
}

pub fn transport_error(url: &str) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        reason: "502 Bad Gateway".to_string(),
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn manifest(&self, _screen: &ScreenId) -> Result<Manifest, FetchError> {
        *self.manifest_calls.lock().unwrap() += 1;
        let next = self.manifests.lock().unwrap().pop_front();
        let mut last = self.last_manifest.lock().unwrap();
        if let Some(next) = next {
            *last = Some(next);
        }
        (*last)
            .clone()
            .unwrap_or_else(|| Err(transport_error("/api/manifest")))
    }

    async fn widget(&self, name: &str) -> Result<WidgetData, FetchError> {
        let next = self
            .widgets
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front);
        let mut last = self.last_widget.lock().unwrap();
        if let Some(next) = next {
            last.insert(name.to_string(), next);
        }
        last.get(name)
            .cloned()
            .unwrap_or_else(|| Err(transport_error("/api/widgets")))
    }
}

/// A zone with default timing on `display`, plus a receiver for its events.
pub fn zone(
    name: &str,
    display: Arc<RecordingDisplay>,
) -> (ZoneLoop, Bus, broadcast::Receiver<Event>) {
    let bus = Bus::new(1024);
    let rx = bus.subscribe();
    let zone = ZoneLoop::new(
        name,
        display,
        endpoints(),
        TimingPolicy::default(),
        bus.clone(),
    );
    (zone, bus, rx)
}

/// Drains every event published so far.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

/// Steps the paused clock by `d`.
pub async fn advance_by(d: Duration) {
    tokio::time::advance(d).await;
}
