//! HTTP client abstraction for the status sources.
//!
//! The Cfx.re clients only ever issue JSON GETs. Going through this trait
//! lets tests hand them canned bodies instead of hitting the network.
//!
//! # Example Usage:
//! ```ignore
//! use crate::http::{HttpClient, DefaultHttpClient};
//!
//! let client: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new(Duration::from_secs(30))?);
//! let servers = CfxServerClient::new(client, "https://servers-frontend.fivem.net/api/servers/single");
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::Error;

/// Sent with every request; the server list rejects blank agents.
pub const USER_AGENT: &str = concat!("cfxwatch/", env!("CARGO_PKG_VERSION"));

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GETs `url` and returns the body of a 2xx response.
    ///
    /// A 404 comes back as `Error::NotFound`, any other non-2xx status as
    /// `Error::Platform`.
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status();
        trace!("GET {} => {}", url, status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("GET {url}")));
        }
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("GET {url}: HTTP {status} => {body_text}")));
        }

        Ok(response.text().await?)
    }
}
