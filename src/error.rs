//! Error types used by the screenvisor runtime and its loops.
//!
//! This module defines three enums:
//!
//! - [`FetchError`]: a manifest or widget fetch failed (transport or protocol).
//! - [`MediaError`]: a mounted item failed to load, or its type is not recognised.
//! - [`RuntimeError`]: the player itself could not start or stop cleanly.
//!
//! Fetch and media errors never leave the loop that detected them: they are turned
//! into bus events and the loop carries on. All three provide `as_label` /
//! `as_message` helpers for logs and the debug overlay.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while fetching remote content.
///
/// Raised by a [`ContentSource`](crate::ContentSource) for both the manifest and
/// widget endpoints.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete or returned a non-success status.
    #[error("transport error for {url}: {reason}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Status line or client error text.
        reason: String,
    },

    /// The response arrived but its body is not a usable document.
    #[error("protocol error for {url}: {reason}")]
    Protocol {
        /// Requested URL.
        url: String,
        /// Parse error or server-reported failure.
        reason: String,
    },
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use screenvisor::FetchError;
    ///
    /// let err = FetchError::Transport { url: "/api/manifest/lobby".into(), reason: "502".into() };
    /// assert_eq!(err.as_label(), "fetch_transport");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "fetch_transport",
            FetchError::Protocol { .. } => "fetch_protocol",
        }
    }

    /// Returns a compact message suitable for the debug overlay.
    pub fn as_message(&self) -> String {
        match self {
            FetchError::Transport { reason, .. } => format!("http {reason}"),
            FetchError::Protocol { reason, .. } => format!("bad document: {reason}"),
        }
    }
}

/// # Errors produced by a mounted playlist item.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The asset behind an item could not be loaded.
    #[error("failed to load {asset}: {reason}")]
    Load {
        /// Asset id or URL of the failing item.
        asset: String,
        /// What the display reported.
        reason: String,
    },

    /// The item carries a type tag no surface exists for.
    #[error("unsupported item type {kind:?}")]
    Unsupported {
        /// Raw type tag as found in the manifest (may be empty).
        kind: String,
    },
}

impl MediaError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use screenvisor::MediaError;
    ///
    /// let err = MediaError::Unsupported { kind: "hologram".into() };
    /// assert_eq!(err.as_label(), "media_unsupported");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MediaError::Load { .. } => "media_load",
            MediaError::Unsupported { .. } => "media_unsupported",
        }
    }

    /// Returns a compact message suitable for the debug overlay.
    pub fn as_message(&self) -> String {
        match self {
            MediaError::Load { asset, .. } => format!("ERROR loading {asset}"),
            MediaError::Unsupported { kind } => format!("Unknown item type: {kind}"),
        }
    }
}

/// # Errors produced by the player runtime.
///
/// These stop the process (at startup) or are reported once at shutdown.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The display URL could not be parsed.
    #[error("invalid display url {url:?}: {reason}")]
    InvalidDisplayUrl {
        /// URL as given.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The display URL has no final path segment to use as screen identity.
    #[error("display url {url:?} has no screen id segment")]
    EmptyScreenId {
        /// URL as given.
        url: String,
    },

    /// Two loops were configured to own the same zone.
    #[error("zone {zone:?} is claimed twice in the layout")]
    LayoutConflict {
        /// Contested zone name.
        zone: String,
    },

    /// The HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    /// Shutdown grace period was exceeded; some loops did not stop in time.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the loops that were still running.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use screenvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidDisplayUrl { .. } => "runtime_invalid_url",
            RuntimeError::EmptyScreenId { .. } => "runtime_empty_screen_id",
            RuntimeError::LayoutConflict { .. } => "runtime_layout_conflict",
            RuntimeError::Client(_) => "runtime_http_client",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}
