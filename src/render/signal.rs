//! # Completion and failure signals from mounted targets.
//!
//! Every mount gets a fresh [`TargetId`] and a [`SignalLink`] that the display uses
//! to report back to the owning zone:
//!
//! ```text
//! display (video ended / asset failed)
//!     └─► SignalLink::ended() / failed(err)
//!            └─► zone signal channel ──► ZoneLoop::on_signal(TargetSignal)
//!                                          ├─ id == current target → handled, target retired
//!                                          └─ otherwise            → StaleIgnored
//! ```
//!
//! A link is **detached** when its target is torn down. After that every send is a
//! no-op, so nothing reaches the zone once teardown has returned.

use std::fmt;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::MediaError;

/// Single-use identity of one mounted target within a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// What happened to a mounted target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignalKind {
    /// Playback finished (self-terminating items only).
    Ended,
    /// The asset failed after mount returned.
    Failed(MediaError),
}

/// A signal tagged with the target it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetSignal {
    pub target: TargetId,
    pub kind: SignalKind,
}

impl TargetSignal {
    pub fn ended(target: TargetId) -> Self {
        Self {
            target,
            kind: SignalKind::Ended,
        }
    }

    pub fn failed(target: TargetId, err: MediaError) -> Self {
        Self {
            target,
            kind: SignalKind::Failed(err),
        }
    }
}

/// Sending half handed to the display for one mounted target.
///
/// Clones share the detach state: detaching any clone silences all of them.
#[derive(Clone, Debug)]
pub struct SignalLink {
    target: TargetId,
    tx: mpsc::UnboundedSender<TargetSignal>,
    detached: CancellationToken,
}

impl SignalLink {
    pub fn new(target: TargetId, tx: mpsc::UnboundedSender<TargetSignal>) -> Self {
        Self {
            target,
            tx,
            detached: CancellationToken::new(),
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Reports completion. Returns `false` if the link is detached or the zone is gone.
    pub fn ended(&self) -> bool {
        self.send(TargetSignal::ended(self.target))
    }

    /// Reports a load failure. Returns `false` if the link is detached or the zone is gone.
    pub fn failed(&self, err: MediaError) -> bool {
        self.send(TargetSignal::failed(self.target, err))
    }

    fn send(&self, signal: TargetSignal) -> bool {
        if self.detached.is_cancelled() {
            return false;
        }
        self.tx.send(signal).is_ok()
    }

    /// Silences the link for good.
    pub fn detach(&self) {
        self.detached.cancel();
    }

    pub fn is_detached(&self) -> bool {
        self.detached.is_cancelled()
    }

    /// Completes once the link is detached. Playback tasks select on this to stop early.
    pub async fn detached(&self) {
        self.detached.cancelled().await;
    }
}
