//! Remote content: manifests and widget documents.
//!
//! [`ContentSource`] is the seam between the loops and the network. The poller and
//! the widget loops only see parsed documents or a [`FetchError`].
//!
//! - [`HttpSource`]: `reqwest` client for the manifest host.

mod http;

pub use http::HttpSource;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::manifest::{Manifest, WidgetData};
use crate::screen::ScreenId;

/// Where manifests and widget data come from.
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    /// Current manifest for `screen`.
    async fn manifest(&self, screen: &ScreenId) -> Result<Manifest, FetchError>;

    /// Current data of the named widget.
    async fn widget(&self, name: &str) -> Result<WidgetData, FetchError>;
}
