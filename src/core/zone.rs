//! # ZoneLoop: rotation of one visual slot.
//!
//! A [`ZoneLoop`] owns one zone of the display: its playlist, a monotonically
//! increasing rotation cursor, the currently mounted [`RenderTarget`] (zero or one)
//! and a single [`ScheduleTimer`].
//!
//! ## Rotation
//! ```text
//! advance():
//!   ├─► cancel timer, tear down current target
//!   ├─► playlist empty → clear zone, publish ZoneEmpty, arm(empty_retry)
//!   └─► item = playlist[cursor % len]; cursor += 1
//!        └─► adapter.mount(item, link(new TargetId))
//!              ├─ ok, timed item   → publish ItemMounted, arm(max(floor, duration))
//!              ├─ ok, video        → publish ItemMounted, wait for Ended signal
//!              ├─ load error       → tear down, publish ItemFailed, arm(fallback)
//!              └─ unknown type     → keep blank target, publish ItemUnsupported, arm(fallback)
//!
//! wakeups:
//!   Timer(epoch)   → epoch current?  advance()            : StaleIgnored
//!   Signal(Ended)  → target current? advance()            : StaleIgnored
//!   Signal(Failed) → target current? fail (as load error) : StaleIgnored
//! ```
//!
//! ## Actor
//! ```text
//! ZoneHandle ── ZoneCommand::{Reset, Stop} ──► ZoneLoop::run(commands, token)
//!                                                loop select (biased):
//!                                                  token.cancelled() → stop(), exit
//!                                                  commands.recv()   → reset()/stop()
//!                                                  wakeup()          → dispatch()
//! ```
//!
//! ## Rules
//! - Every operation runs to completion before the next command or wakeup is looked at,
//!   so teardown of one target always finishes before the next mount starts.
//! - `reset` and `stop` cancel the timer before anything else.
//! - Handling a signal or timer retires the target/epoch it refers to; anything that
//!   refers to it afterwards is ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::timer::{ScheduleTimer, TimerTicket};
use crate::display::Display;
use crate::error::MediaError;
use crate::events::{Bus, Event, EventKind};
use crate::manifest::{PlaylistItem, Theme};
use crate::policies::{Schedule, TimingPolicy};
use crate::render::{Adapter, Mount, RenderTarget, SignalKind, SignalLink, TargetId, TargetSignal};
use crate::screen::Endpoints;

/// Commands accepted by a running zone actor.
#[derive(Clone, Debug)]
pub enum ZoneCommand {
    /// Replace the playlist and restart from cursor zero.
    Reset(Arc<[PlaylistItem]>),
    /// Tear down and clear; stay idle until the next reset.
    Stop,
}

/// What woke the zone up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Wakeup {
    Timer(u64),
    Signal(TargetSignal),
}

/// Sending side of a zone actor's command queue.
#[derive(Clone, Debug)]
pub struct ZoneHandle {
    name: Arc<str>,
    tx: mpsc::Sender<ZoneCommand>,
}

impl ZoneHandle {
    /// Creates a handle and the receiver to pass to [`ZoneLoop::run`].
    pub fn channel(
        name: impl Into<Arc<str>>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ZoneCommand>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                name: name.into(),
                tx,
            },
            rx,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues a reset. Returns `false` if the zone actor is gone.
    pub async fn reset(&self, playlist: Arc<[PlaylistItem]>) -> bool {
        self.tx.send(ZoneCommand::Reset(playlist)).await.is_ok()
    }

    /// Queues a stop. Returns `false` if the zone actor is gone.
    pub async fn stop(&self) -> bool {
        self.tx.send(ZoneCommand::Stop).await.is_ok()
    }
}

/// State and rotation logic of one zone.
pub struct ZoneLoop {
    name: Arc<str>,
    adapter: Adapter,
    timing: TimingPolicy,
    bus: Bus,

    playlist: Arc<[PlaylistItem]>,
    cursor: u64,
    current: Option<RenderTarget>,
    timer: ScheduleTimer,
    next_target: u64,

    signals_tx: mpsc::UnboundedSender<TargetSignal>,
    signals_rx: mpsc::UnboundedReceiver<TargetSignal>,
}

impl ZoneLoop {
    /// Creates an idle zone with an empty playlist. Nothing is shown until the first
    /// [`reset`](Self::reset) or [`advance`](Self::advance).
    pub fn new(
        name: impl Into<Arc<str>>,
        display: Arc<dyn Display>,
        endpoints: Endpoints,
        timing: TimingPolicy,
        bus: Bus,
    ) -> Self {
        let name = name.into();
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        Self {
            adapter: Adapter::new(Arc::clone(&name), display, endpoints),
            name,
            timing,
            bus,
            playlist: Arc::from(Vec::new()),
            cursor: 0,
            current: None,
            timer: ScheduleTimer::new(),
            next_target: 0,
            signals_tx,
            signals_rx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of advances since the last reset.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn playlist_len(&self) -> usize {
        self.playlist.len()
    }

    /// Id of the mounted target, if any.
    pub fn current_target(&self) -> Option<TargetId> {
        self.current.as_ref().map(RenderTarget::id)
    }

    pub fn pending_timer(&self) -> Option<TimerTicket> {
        self.timer.pending()
    }

    /// Theme for cards mounted from now on.
    pub fn set_theme(&mut self, theme: &Theme) {
        self.adapter.set_theme(theme);
    }

    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_zone(Arc::clone(&self.name))
    }

    fn next_target_id(&mut self) -> TargetId {
        self.next_target += 1;
        TargetId::new(self.next_target)
    }

    async fn teardown_current(&mut self) {
        if let Some(target) = self.current.take() {
            let label = target.label().to_string();
            self.adapter.teardown(target).await;
            self.bus
                .publish(self.event(EventKind::TargetTornDown).with_item(label));
        }
    }

    /// Shows the next item and schedules the one after it.
    pub async fn advance(&mut self) {
        self.timer.cancel();
        self.teardown_current().await;

        if self.playlist.is_empty() {
            self.adapter.clear().await;
            let retry = self.timing.empty_retry;
            self.timer.arm(retry);
            self.bus
                .publish(self.event(EventKind::ZoneEmpty).with_delay(retry));
            return;
        }

        let playlist = Arc::clone(&self.playlist);
        let index = (self.cursor % playlist.len() as u64) as usize;
        let item = &playlist[index];
        self.cursor += 1;

        let id = self.next_target_id();
        let link = SignalLink::new(id, self.signals_tx.clone());
        let Mount { target, error } = self.adapter.mount(item, link).await;
        self.current = Some(target);

        match error {
            Some(err) => self.fail_current(err).await,
            None => {
                let ev = self
                    .event(EventKind::ItemMounted)
                    .with_item(item.label())
                    .with_cursor(self.cursor);
                match self.timing.schedule_for(item) {
                    Schedule::After(delay) => {
                        self.timer.arm(delay);
                        self.bus.publish(ev.with_delay(delay));
                    }
                    Schedule::OnCompletion => self.bus.publish(ev),
                }
            }
        }
    }

    /// Skips the current item after the fallback delay.
    ///
    /// A load failure tears the target down; an unsupported item keeps its blank target.
    async fn fail_current(&mut self, err: MediaError) {
        self.timer.cancel();
        let label = self
            .current
            .as_ref()
            .map(|t| t.label().to_string())
            .unwrap_or_default();

        let kind = match err {
            MediaError::Unsupported { .. } => EventKind::ItemUnsupported,
            _ => {
                self.teardown_current().await;
                EventKind::ItemFailed
            }
        };

        let fallback = self.timing.fallback;
        self.timer.arm(fallback);
        self.bus.publish(
            self.event(kind)
                .with_item(label)
                .with_reason(err.to_string())
                .with_delay(fallback),
        );
    }

    /// Replaces the playlist and restarts from cursor zero.
    pub async fn reset(&mut self, playlist: Arc<[PlaylistItem]>) {
        self.timer.cancel();
        self.teardown_current().await;
        self.playlist = playlist;
        self.cursor = 0;
        self.bus
            .publish(self.event(EventKind::ZoneReset).with_count(self.playlist.len()));
        self.advance().await;
    }

    /// Cancels the timer, tears down and clears the zone.
    pub async fn stop(&mut self) {
        self.timer.cancel();
        self.teardown_current().await;
        self.adapter.clear().await;
        self.bus.publish(self.event(EventKind::ZoneStopped));
    }

    /// Waits for the next timer deadline or target signal.
    ///
    /// Cancel-safe: dropping the future loses nothing.
    pub async fn wakeup(&mut self) -> Wakeup {
        let ticket = self.timer.pending();
        tokio::select! {
            biased;
            Some(signal) = self.signals_rx.recv() => Wakeup::Signal(signal),
            epoch = ScheduleTimer::wait(ticket) => Wakeup::Timer(epoch),
        }
    }

    pub async fn dispatch(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Timer(epoch) => self.on_timer(epoch).await,
            Wakeup::Signal(signal) => self.on_signal(signal).await,
        }
    }

    /// Handles a timer wakeup; stale epochs are ignored.
    pub async fn on_timer(&mut self, epoch: u64) {
        if self.timer.take(epoch) {
            self.advance().await;
        } else {
            self.bus.publish(
                self.event(EventKind::StaleIgnored)
                    .with_reason(format!("timer epoch {epoch}")),
            );
        }
    }

    /// Handles a target signal; signals for anything but the current target are ignored.
    pub async fn on_signal(&mut self, signal: TargetSignal) {
        if self.current_target() != Some(signal.target) {
            self.bus.publish(
                self.event(EventKind::StaleIgnored)
                    .with_reason(format!("signal for {}", signal.target)),
            );
            return;
        }

        match signal.kind {
            SignalKind::Ended => {
                let label = self
                    .current
                    .as_ref()
                    .map(|t| t.label().to_string())
                    .unwrap_or_default();
                self.bus
                    .publish(self.event(EventKind::ItemCompleted).with_item(label));
                self.advance().await;
            }
            SignalKind::Failed(err) => self.fail_current(err).await,
        }
    }

    /// Runs the zone until `token` is cancelled or every handle is dropped.
    /// The zone is stopped on exit.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<ZoneCommand>,
        token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                cmd = commands.recv() => match cmd {
                    Some(ZoneCommand::Reset(playlist)) => self.reset(playlist).await,
                    Some(ZoneCommand::Stop) => self.stop().await,
                    None => break,
                },
                wakeup = self.wakeup() => self.dispatch(wakeup).await,
            }
        }
        self.stop().await;
    }
}
