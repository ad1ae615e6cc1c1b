//! # Timing policy for zone rotation.
//!
//! [`TimingPolicy`] decides **when** a zone advances after mounting an item.
//! It is parameterized by:
//! - [`TimingPolicy::floor`] the minimum display time of a self-timed item;
//! - [`TimingPolicy::default_duration`] display time when an item sets none;
//! - [`TimingPolicy::fallback`] delay before skipping a failed or unknown item;
//! - [`TimingPolicy::empty_retry`] re-check interval of an empty playlist.
//!
//! All delays are fixed. A display screen has no caller waiting on it, so there is
//! no growth between retries.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use screenvisor::{PlaylistItem, Schedule, TimingPolicy};
//!
//! let timing = TimingPolicy::default();
//!
//! let img = PlaylistItem::image("promo.png");
//! assert_eq!(timing.schedule_for(&img), Schedule::After(Duration::from_secs(10)));
//!
//! let blip = PlaylistItem::image("blip.png").with_duration(Duration::from_millis(300));
//! assert_eq!(timing.schedule_for(&blip), Schedule::After(Duration::from_secs(2)));
//!
//! let clip = PlaylistItem::video("clip.mp4").with_duration(Duration::from_secs(5));
//! assert_eq!(timing.schedule_for(&clip), Schedule::OnCompletion);
//! ```

use std::time::Duration;

use crate::manifest::PlaylistItem;

/// How the next advance of a zone is triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Advance after a fixed delay.
    After(Duration),
    /// Advance when the mounted target signals completion.
    OnCompletion,
}

/// Fixed delays that drive a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingPolicy {
    /// Minimum display time of a self-timed item.
    pub floor: Duration,
    /// Display time of an item that sets none.
    pub default_duration: Duration,
    /// Delay before skipping a failed or unsupported item.
    pub fallback: Duration,
    /// Re-check interval while the playlist is empty.
    pub empty_retry: Duration,
}

impl Default for TimingPolicy {
    /// Returns a policy with:
    /// - `floor = 2s`;
    /// - `default_duration = 10s`;
    /// - `fallback = 3s`;
    /// - `empty_retry = 5s`.
    fn default() -> Self {
        Self {
            floor: Duration::from_secs(2),
            default_duration: Duration::from_secs(10),
            fallback: Duration::from_secs(3),
            empty_retry: Duration::from_secs(5),
        }
    }
}

impl TimingPolicy {
    /// Returns a copy whose default display time is `default`, when given.
    pub fn with_default_duration(mut self, default: Option<Duration>) -> Self {
        if let Some(d) = default {
            self.default_duration = d;
        }
        self
    }

    /// Display time of a self-timed item: its own duration or the default,
    /// raised to [`TimingPolicy::floor`].
    pub fn display_time(&self, item: &PlaylistItem) -> Duration {
        item.duration
            .unwrap_or(self.default_duration)
            .max(self.floor)
    }

    /// Decides how the zone advances past `item`.
    ///
    /// Video items own their completion; everything else is timed.
    pub fn schedule_for(&self, item: &PlaylistItem) -> Schedule {
        if item.is_self_terminating() {
            Schedule::OnCompletion
        } else {
            Schedule::After(self.display_time(item))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Card;

    #[test]
    fn missing_duration_uses_default() {
        let policy = TimingPolicy::default();
        assert_eq!(
            policy.schedule_for(&PlaylistItem::image("a.png")),
            Schedule::After(Duration::from_secs(10))
        );
    }

    #[test]
    fn short_durations_are_raised_to_floor() {
        let policy = TimingPolicy::default();
        for d in [Duration::ZERO, Duration::from_millis(1), Duration::from_millis(1999)] {
            let item = PlaylistItem::frame("https://example.com").with_duration(d);
            assert_eq!(policy.display_time(&item), Duration::from_secs(2));
        }
    }

    #[test]
    fn explicit_duration_above_floor_is_kept() {
        let policy = TimingPolicy::default();
        let item = PlaylistItem::card(Card::default()).with_duration(Duration::from_secs(45));
        assert_eq!(
            policy.schedule_for(&item),
            Schedule::After(Duration::from_secs(45))
        );
    }

    #[test]
    fn zone_default_overrides_global_default() {
        let policy = TimingPolicy::default().with_default_duration(Some(Duration::from_secs(18)));
        assert_eq!(
            policy.display_time(&PlaylistItem::frame("https://example.com")),
            Duration::from_secs(18)
        );
        let same = TimingPolicy::default().with_default_duration(None);
        assert_eq!(same, TimingPolicy::default());
    }

    #[test]
    fn video_waits_for_completion() {
        let policy = TimingPolicy::default();
        let item = PlaylistItem::video("clip.mp4").with_duration(Duration::from_secs(30));
        assert_eq!(policy.schedule_for(&item), Schedule::OnCompletion);
    }

    #[test]
    fn unknown_items_are_timed() {
        let policy = TimingPolicy::default();
        assert_eq!(
            policy.schedule_for(&PlaylistItem::unknown("hologram")),
            Schedule::After(Duration::from_secs(10))
        );
    }
}
