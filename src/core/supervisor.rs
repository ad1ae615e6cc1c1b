//! # Player: runs every loop of one screen and shuts them down gracefully.
//!
//! The [`Player`] owns the event bus, a [`SubscriberSet`] and the runtime
//! configuration. It spawns one actor per zone, the manifest poller and the widget
//! loops, handles OS signals and enforces a grace period on shutdown.
//!
//! ## High-level architecture
//! ```text
//! Preparation:
//!   subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)   (fire-and-forget)
//!
//! Spawn actors (each with runtime_token.child_token()):
//!   ZoneSpec[i]   ──► ZoneLoop::run(commands_i)      ◄── ZoneHandle_i ──┐
//!   WidgetSpec[j] ──► WidgetLoop::run()                                 │
//!   ManifestPoller::run()  ── reset(playlist) per bound zone ───────────┘
//!
//! Event flow:
//!   loops ── publish(Event) ──► Bus ──► listener ──► SubscriberSet ──► LogWriter / DebugSurface / ...
//!
//! Shutdown path:
//!   OS signal or Player::shutdown()
//!             └─► Bus.publish(ShutdownRequested)
//!             └─► runtime_token.cancel()   → every actor stops its zone and exits
//!             └─► wait_all_with_grace(cfg.grace):
//!                    ├─ all joined        → Bus.publish(AllStoppedWithin)
//!                    └─ timeout exceeded  → Bus.publish(GraceExceeded), RuntimeError::GraceExceeded
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::builder::PlayerBuilder;
use super::layout::Layout;
use super::poller::ManifestPoller;
use super::shutdown;
use super::widget::WidgetLoop;
use super::zone::{ZoneHandle, ZoneLoop};
use crate::{
    core::Config,
    display::Display,
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    policies::TimingPolicy,
    screen::ScreenAddress,
    source::ContentSource,
    subscribers::SubscriberSet,
};

/// Completes on a termination signal; never completes if listeners cannot be installed.
async fn os_signal() {
    if shutdown::wait_for_shutdown_signal().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Queue depth of a zone's command channel.
const ZONE_COMMAND_CAPACITY: usize = 8;

/// Runs one screen: zones, poller, widgets, subscribers and shutdown.
pub struct Player {
    pub(super) cfg: Config,
    pub(super) layout: Layout,
    pub(super) address: ScreenAddress,
    pub(super) source: Arc<dyn ContentSource>,
    pub(super) display: Arc<dyn Display>,
    pub(super) bus: Bus,
    pub(super) subs: Arc<SubscriberSet>,
    pub(super) runtime_token: CancellationToken,
}

impl Player {
    /// Starts building a player for the screen at `address`.
    pub fn builder(cfg: Config, address: ScreenAddress) -> PlayerBuilder {
        PlayerBuilder::new(cfg, address)
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Requests a graceful shutdown, as an OS signal would.
    pub fn shutdown(&self) {
        self.runtime_token.cancel();
    }

    /// Runs until a termination signal (or [`shutdown`](Self::shutdown)), then
    /// stops every loop within [`Config::grace`].
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.subscriber_listener();

        let mut set = JoinSet::new();
        let names = self.spawn_actors(&mut set);
        self.drive_shutdown(&mut set, names).await
    }

    /// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    fn zone_loop(&self, name: &str, timing: TimingPolicy) -> ZoneLoop {
        ZoneLoop::new(
            name,
            Arc::clone(&self.display),
            self.address.endpoints().clone(),
            timing,
            self.bus.clone(),
        )
    }

    /// Spawns zone, widget and poller actors. Returns the names of everything spawned.
    fn spawn_actors(&self, set: &mut JoinSet<Arc<str>>) -> BTreeSet<Arc<str>> {
        let mut names = BTreeSet::new();
        let mut spawn = |name: Arc<str>, fut: BoxFuture<'static, ()>| {
            names.insert(Arc::clone(&name));
            set.spawn(async move {
                fut.await;
                name
            });
        };

        let mut poller = ManifestPoller::new(
            Arc::clone(&self.source),
            Arc::clone(&self.display),
            self.address.endpoints().clone(),
            self.address.screen().clone(),
            self.cfg.poll_interval,
            self.bus.clone(),
        );
        if let Some(widget) = &self.layout.ticker {
            poller = poller.with_ticker(widget.clone(), self.cfg.ticker_fallback.clone());
        }

        for spec in &self.layout.zones {
            let timing = self.cfg.timing().with_default_duration(spec.default_duration);
            let zone = self.zone_loop(&spec.name, timing);
            let (handle, commands) = ZoneHandle::channel(spec.name.as_str(), ZONE_COMMAND_CAPACITY);
            poller = poller.bind(spec.playlist.clone(), handle);
            spawn(
                Arc::from(format!("zone:{}", spec.name)),
                zone.run(commands, self.runtime_token.child_token()).boxed(),
            );
        }

        for spec in &self.layout.widgets {
            let zone = self.zone_loop(&spec.zone, self.cfg.timing());
            let widget = WidgetLoop::new(
                spec.name.as_str(),
                zone,
                Arc::clone(&self.source),
                self.bus.clone(),
            )
            .with_refresh(self.cfg.widget_refresh_interval());
            spawn(
                Arc::from(format!("widget:{}", spec.name)),
                widget.run(self.runtime_token.child_token()).boxed(),
            );
        }

        spawn(
            Arc::from("poller"),
            poller.run(self.runtime_token.child_token()).boxed(),
        );
        names
    }

    /// Waits until either all actors finish or a shutdown is requested.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<Arc<str>>,
        names: BTreeSet<Arc<str>>,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = os_signal() => {}
            _ = self.runtime_token.cancelled() => {}
            _ = async {
                while let Some(res) = set.join_next().await {
                    if let Err(err) = res {
                        warn!(error = %err, "actor terminated abnormally");
                    }
                }
            } => {
                return Ok(());
            }
        }
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.runtime_token.cancel();
        self.wait_all_with_grace(set, names).await
    }

    /// Waits for all actors to finish within the configured grace period.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<Arc<str>>,
        mut alive: BTreeSet<Arc<str>>,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async {
            while let Some(res) = set.join_next().await {
                match res {
                    Ok(name) => {
                        alive.remove(&name);
                    }
                    Err(err) => warn!(error = %err, "actor terminated abnormally"),
                }
            }
        };

        match tokio::time::timeout(grace, done).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                set.abort_all();
                Err(RuntimeError::GraceExceeded {
                    grace,
                    stuck: alive.iter().map(|n| n.to_string()).collect(),
                })
            }
        }
    }
}
