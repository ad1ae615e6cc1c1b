use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{layout::Layout, supervisor::Player};
use crate::{
    core::Config,
    display::{ConsoleDisplay, Display},
    error::RuntimeError,
    events::Bus,
    screen::ScreenAddress,
    source::{ContentSource, HttpSource},
    subscribers::{DebugSurface, Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Player`] with optional parts.
pub struct PlayerBuilder {
    cfg: Config,
    address: ScreenAddress,
    layout: Layout,
    subscribers: Vec<Arc<dyn Subscribe>>,
    display: Option<Arc<dyn Display>>,
    source: Option<Arc<dyn ContentSource>>,
    debug: Option<bool>,
}

impl PlayerBuilder {
    /// Creates a builder with the single-zone layout.
    pub fn new(cfg: Config, address: ScreenAddress) -> Self {
        Self {
            cfg,
            address,
            layout: Layout::single(),
            subscribers: Vec::new(),
            display: None,
            source: None,
            debug: None,
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Display to render on. Defaults to a [`ConsoleDisplay`].
    pub fn with_display(mut self, display: Arc<dyn Display>) -> Self {
        self.display = Some(display);
        self
    }

    /// Content source. Defaults to an [`HttpSource`] on the screen's host.
    pub fn with_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Forces the debug overlay on or off, overriding the `debug=1` URL flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Builds the player.
    ///
    /// Must be called from within a tokio runtime (subscriber workers are spawned here).
    ///
    /// Fails if the layout gives one zone to two loops, or if the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<Player, RuntimeError> {
        self.layout.validate()?;

        let source: Arc<dyn ContentSource> = match self.source {
            Some(source) => source,
            None => Arc::new(HttpSource::new(
                self.address.endpoints().clone(),
                self.cfg.request_timeout,
            )?),
        };
        let display: Arc<dyn Display> = self
            .display
            .unwrap_or_else(|| Arc::new(ConsoleDisplay::new(ConsoleDisplay::DEFAULT_VIDEO_LENGTH)));

        let mut subscribers = self.subscribers;
        if self.debug.unwrap_or(self.address.debug()) {
            subscribers.push(Arc::new(DebugSurface::new(
                Arc::clone(&display),
                self.address.screen().clone(),
            )));
        }

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));

        Ok(Player {
            cfg: self.cfg,
            layout: self.layout,
            address: self.address,
            source,
            display,
            bus,
            subs,
            runtime_token: CancellationToken::new(),
        })
    }
}
