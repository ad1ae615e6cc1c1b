//! HTTP content source.
//!
//! ```text
//! GET {base}/api/manifest/{screen}   Cache-Control: no-store
//! GET {base}/api/widgets/{name}      Cache-Control: no-store
//!
//! send error / timeout / non-2xx   → FetchError::Transport
//! body not JSON / ok:false         → FetchError::Protocol
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use url::Url;

use super::ContentSource;
use crate::error::{FetchError, RuntimeError};
use crate::manifest::{DocumentError, Manifest, WidgetData};
use crate::screen::{Endpoints, ScreenId};

/// `reqwest`-backed [`ContentSource`].
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    endpoints: Endpoints,
}

impl HttpSource {
    /// Builds a client with the given per-request timeout.
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, RuntimeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("screenvisor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, endpoints))
    }

    /// Uses an existing client (shared pool, custom proxy, ...).
    pub fn with_client(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn fetch(&self, url: Url) -> Result<(String, Vec<u8>), FetchError> {
        let shown = url.to_string();
        let transport = |reason: String| FetchError::Transport {
            url: shown.clone(),
            reason,
        };

        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(transport(status.to_string()));
        }

        let body = resp.bytes().await.map_err(|e| transport(e.to_string()))?;
        Ok((shown, body.to_vec()))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn manifest(&self, screen: &ScreenId) -> Result<Manifest, FetchError> {
        let (url, body) = self.fetch(self.endpoints.manifest(screen)).await?;
        Manifest::parse(&body).map_err(|e| FetchError::Protocol {
            url,
            reason: match e {
                DocumentError::Rejected(msg) => msg,
                other => other.to_string(),
            },
        })
    }

    async fn widget(&self, name: &str) -> Result<WidgetData, FetchError> {
        let (url, body) = self.fetch(self.endpoints.widget(name)).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Protocol {
            url,
            reason: e.to_string(),
        })
    }
}
