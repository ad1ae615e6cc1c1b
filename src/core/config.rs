//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings of a player.
//!
//! Config is used in two ways:
//! 1. **Player creation**: `Player::builder(config, address)`
//! 2. **Zone timing**: `config.timing()` seeds every zone's [`TimingPolicy`]
//!
//! ## Sentinel values
//! - `widget_refresh = 0s` → widgets are fetched once
//! - `grace = 0s` → do not wait for loops on shutdown

use std::time::Duration;

use crate::policies::TimingPolicy;

/// Line shown on the ticker when its widget is empty or unreachable.
pub const DEFAULT_TICKER_FALLBACK: &str = "Ask about our wellness & aesthetic services today.";

/// Global configuration of a player.
///
/// ## Field semantics
/// - `poll_interval`: pause between manifest fetches
/// - `floor`, `default_duration`, `fallback`, `empty_retry`: zone timing (see [`TimingPolicy`])
/// - `widget_refresh`: widget re-fetch interval (`0s` = never)
/// - `request_timeout`: per-request HTTP timeout
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
/// - `grace`: maximum wait for loops to stop on shutdown
/// - `ticker_fallback`: ticker text when the ticker widget yields nothing
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct Config {
    /// Pause between two manifest polls. No backoff: failures retry on the same beat.
    pub poll_interval: Duration,

    /// Minimum display time of a self-timed item.
    pub floor: Duration,

    /// Display time of items that set none, unless the zone has its own default.
    pub default_duration: Duration,

    /// Delay before skipping a failed or unsupported item.
    pub fallback: Duration,

    /// Re-check interval of an empty playlist.
    pub empty_retry: Duration,

    /// Widget refresh interval.
    ///
    /// - `Duration::ZERO` = fetch once at startup
    /// - `> 0` = re-fetch and restart the widget rotation on this interval
    pub widget_refresh: Duration,

    /// Per-request timeout of manifest and widget fetches.
    pub request_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Subscribers lagging behind more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,

    /// Maximum time to wait for loops to stop after a shutdown signal.
    pub grace: Duration,

    /// Ticker text used when the ticker widget has no lines or cannot be fetched.
    pub ticker_fallback: String,
}

impl Config {
    /// Zone timing built from the configured delays.
    #[inline]
    pub fn timing(&self) -> TimingPolicy {
        TimingPolicy {
            floor: self.floor,
            default_duration: self.default_duration,
            fallback: self.fallback,
            empty_retry: self.empty_retry,
        }
    }

    /// Returns the widget refresh interval as an `Option`.
    ///
    /// - `None` → fetch once
    /// - `Some(d)` → refresh every `d`
    #[inline]
    pub fn widget_refresh_interval(&self) -> Option<Duration> {
        if self.widget_refresh.is_zero() {
            None
        } else {
            Some(self.widget_refresh)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `poll_interval = 5s`
    /// - `floor = 2s`, `default_duration = 10s`, `fallback = 3s`, `empty_retry = 5s`
    /// - `widget_refresh = 0s` (fetch once)
    /// - `request_timeout = 10s`
    /// - `bus_capacity = 1024`
    /// - `grace = 5s`
    fn default() -> Self {
        let timing = TimingPolicy::default();
        Self {
            poll_interval: Duration::from_secs(5),
            floor: timing.floor,
            default_duration: timing.default_duration,
            fallback: timing.fallback,
            empty_retry: timing.empty_retry,
            widget_refresh: Duration::ZERO,
            request_timeout: Duration::from_secs(10),
            bus_capacity: 1024,
            grace: Duration::from_secs(5),
            ticker_fallback: DEFAULT_TICKER_FALLBACK.to_string(),
        }
    }
}
