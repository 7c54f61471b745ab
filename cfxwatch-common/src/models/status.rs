/// What the server list reports for a live server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub hostname: String,
    pub clients: u32,
    pub max_clients: u32,
}

/// Overall health of the Cfx.re platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformStatus {
    pub everything_ok: bool,
    /// Statuspage indicator: "none", "minor", "major" or "critical".
    pub indicator: String,
    pub description: String,
}

/// One row of the status page component list.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusComponent {
    pub name: String,
    pub status: String,
}

impl StatusComponent {
    pub fn is_operational(&self) -> bool {
        self.status.eq_ignore_ascii_case("operational")
    }
}
