// ========================================================
// File: cfxwatch-core/src/platforms/cfx/servers.rs
// ========================================================
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cfxwatch_common::models::status::ServerInfo;
use cfxwatch_common::traits::api::ServerQuery;

use crate::Error;
use crate::http::HttpClient;

/// Response from the "single server" endpoint.
#[derive(Debug, Deserialize)]
pub struct SingleServerResponse {
    #[serde(rename = "EndPoint", default)]
    pub end_point: String,
    #[serde(rename = "Data")]
    pub data: ServerData,
}

/// The part of the server record we read.
#[derive(Debug, Deserialize)]
pub struct ServerData {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub clients: u32,
    #[serde(default)]
    pub sv_maxclients: u32,
}

/// Looks servers up on the Cfx.re server list by join id.
pub struct CfxServerClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl CfxServerClient {
    /// `base_url` is the "single server" endpoint without trailing slash,
    /// e.g. `https://servers-frontend.fivem.net/api/servers/single`.
    pub fn new(http: Arc<dyn HttpClient>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn server_url(&self, server_id: &str) -> String {
        format!("{}/{}", self.base_url, server_id)
    }
}

#[async_trait]
impl ServerQuery for CfxServerClient {
    async fn fetch_server(&self, server_id: &str) -> Result<ServerInfo, Error> {
        if server_id.is_empty() {
            return Err(Error::Config("server id is empty".into()));
        }
        let body = self
            .http
            .get(self.server_url(server_id), HashMap::new())
            .await?;
        let parsed: SingleServerResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("server list response for '{server_id}': {e}")))?;

        debug!(
            "Server '{}' ({}) => {}/{} players",
            server_id, parsed.end_point, parsed.data.clients, parsed.data.sv_maxclients
        );

        Ok(ServerInfo {
            hostname: parsed.data.hostname,
            clients: parsed.data.clients,
            max_clients: parsed.data.sv_maxclients,
        })
    }
}
