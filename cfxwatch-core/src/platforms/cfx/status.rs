// ========================================================
// File: cfxwatch-core/src/platforms/cfx/status.rs
// ========================================================
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cfxwatch_common::models::status::{PlatformStatus, StatusComponent};
use cfxwatch_common::traits::api::PlatformStatusSource;

use crate::Error;
use crate::http::HttpClient;

/// Response from Statuspage's `status.json`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: StatusIndicator,
}

#[derive(Debug, Deserialize)]
pub struct StatusIndicator {
    /// "none" when every component is operational.
    pub indicator: String,
    #[serde(default)]
    pub description: String,
}

/// Response from Statuspage's `components.json`.
#[derive(Debug, Deserialize)]
pub struct ComponentsResponse {
    pub components: Vec<ComponentData>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentData {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub position: i64,
}

/// Reads the Cfx.re status page through its Statuspage v2 API.
pub struct CfxStatusClient {
    http: Arc<dyn HttpClient>,
    api_base: String,
}

impl CfxStatusClient {
    /// `api_base` is e.g. `https://status.cfx.re/api/v2`.
    pub fn new(http: Arc<dyn HttpClient>, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlatformStatusSource for CfxStatusClient {
    async fn fetch_status(&self) -> Result<PlatformStatus, Error> {
        let url = format!("{}/status.json", self.api_base);
        let body = self.http.get(url, HashMap::new()).await?;
        let parsed: StatusResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("status.json: {e}")))?;

        debug!("Cfx.re status indicator='{}' ({})", parsed.status.indicator, parsed.status.description);

        Ok(PlatformStatus {
            everything_ok: parsed.status.indicator == "none",
            indicator: parsed.status.indicator,
            description: parsed.status.description,
        })
    }

    async fn fetch_components(&self) -> Result<Vec<StatusComponent>, Error> {
        let url = format!("{}/components.json", self.api_base);
        let body = self.http.get(url, HashMap::new()).await?;
        let mut parsed: ComponentsResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("components.json: {e}")))?;

        // Page order, so the embed lists components the way the site does.
        parsed.components.sort_by_key(|c| c.position);

        Ok(parsed
            .components
            .into_iter()
            .map(|c| StatusComponent {
                name: c.name,
                status: c.status,
            })
            .collect())
    }
}
