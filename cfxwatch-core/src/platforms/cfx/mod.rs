//! Clients for the public Cfx.re endpoints: the FiveM server list and the
//! Statuspage-hosted platform status.

pub mod servers;
pub mod status;

pub use servers::CfxServerClient;
pub use status::CfxStatusClient;
