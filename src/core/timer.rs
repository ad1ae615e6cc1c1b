//! # Single pending deadline with epoch tagging.
//!
//! A [`ScheduleTimer`] holds at most one deadline. Every [`arm`](ScheduleTimer::arm)
//! replaces the previous one and bumps the epoch; a wakeup is only honoured if its
//! epoch still matches the pending one ([`take`](ScheduleTimer::take)).
//!
//! ```text
//! arm(3s)  → epoch 1 pending
//! arm(10s) → epoch 2 pending (epoch 1 is now stale)
//! take(1)  → false   take(2) → true, nothing pending
//! ```

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Longest wait a timer will actually schedule (about thirty years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Snapshot of the pending deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerTicket {
    pub epoch: u64,
    pub deadline: Instant,
}

#[derive(Debug, Default)]
pub struct ScheduleTimer {
    epoch: u64,
    pending: Option<TimerTicket>,
}

impl ScheduleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending deadline with `now + delay`. Returns the new epoch.
    ///
    /// A delay past the clock's range is parked far in the future.
    pub fn arm(&mut self, delay: Duration) -> u64 {
        let now = Instant::now();
        self.epoch += 1;
        self.pending = Some(TimerTicket {
            epoch: self.epoch,
            deadline: now
                .checked_add(delay)
                .or_else(|| now.checked_add(FAR_FUTURE))
                .unwrap_or(now),
        });
        self.epoch
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consumes the pending deadline if `epoch` is the current one.
    pub fn take(&mut self, epoch: u64) -> bool {
        match self.pending {
            Some(t) if t.epoch == epoch => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<TimerTicket> {
        self.pending
    }

    /// Sleeps until `ticket` is due and returns its epoch; never completes for `None`.
    pub async fn wait(ticket: Option<TimerTicket>) -> u64 {
        match ticket {
            Some(t) => {
                sleep_until(t.deadline).await;
                t.epoch
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_invalidates_previous_epoch() {
        let mut timer = ScheduleTimer::new();
        let first = timer.arm(Duration::from_secs(3));
        let second = timer.arm(Duration::from_secs(10));
        assert_ne!(first, second);
        assert!(!timer.take(first));
        assert!(timer.take(second));
        assert!(timer.pending().is_none());
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let mut timer = ScheduleTimer::new();
        let epoch = timer.arm(Duration::from_secs(1));
        timer.cancel();
        assert!(!timer.take(epoch));
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_delay_is_parked_far_ahead() {
        let mut timer = ScheduleTimer::new();
        let epoch = timer.arm(Duration::MAX);
        let ticket = timer.pending().unwrap();
        assert_eq!(ticket.epoch, epoch);
        assert!(ticket.deadline >= Instant::now() + Duration::from_secs(86_400 * 365));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_completes_at_deadline() {
        let mut timer = ScheduleTimer::new();
        let epoch = timer.arm(Duration::from_secs(5));
        let start = Instant::now();
        assert_eq!(ScheduleTimer::wait(timer.pending()).await, epoch);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
