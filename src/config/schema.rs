//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! monitor. All types derive Serde traits for deserialization from the
//! TOML config file.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the bonding monitor.
///
/// Every field except `health_check_timeout` is required; a config file
/// missing one of them is rejected at parse time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// URL probed for every monitored server (e.g. "https://example.com/healthz").
    pub health_check_url: String,

    /// Seconds between probe cycles.
    pub health_check_interval: u64,

    /// Per-probe timeout in seconds.
    #[serde(default = "default_health_check_timeout")]
    pub health_check_timeout: u64,

    /// Hostname or address of the managed switch.
    pub switch_host: String,

    /// Switch API username.
    pub switch_user: String,

    /// Switch API password.
    pub switch_password: String,

    /// Monitored servers and the switch port each one hangs off.
    pub servers: Vec<ServerEntry>,
}

/// One monitored server: the address probed and the port acted on.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerEntry {
    /// Address the health check is resolved to for this server.
    pub server_ip: IpAddr,

    /// Switch interface name (e.g. "ether3").
    pub switch_port: String,
}

fn default_health_check_timeout() -> u64 {
    10
}
