//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout at least one second)
//! - Check the health check URL is something the probe can use
//! - Detect server entries that would fight over the same port
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::{Host, Url};

use crate::config::schema::MonitorConfig;

/// A single semantic problem in an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The health check URL cannot be parsed or probed.
    #[error("health_check_url '{url}' is unusable: {reason}")]
    BadUrl { url: String, reason: String },

    /// Probe cycles need a positive period.
    #[error("health_check_interval must be at least 1 second")]
    ZeroInterval,

    /// Probes need a positive timeout.
    #[error("health_check_timeout must be at least 1 second")]
    ZeroTimeout,

    /// No switch to talk to.
    #[error("switch_host must not be empty")]
    EmptySwitchHost,

    /// The switch API requires credentials.
    #[error("switch_user must not be empty")]
    EmptySwitchUser,

    /// A server entry with no port cannot be acted on.
    #[error("server entry for {0} has an empty switch_port")]
    EmptySwitchPort(String),

    /// The same address cannot carry two sets of counters.
    #[error("server_ip {0} appears in more than one server entry")]
    DuplicateServer(String),

    /// Two servers steering one port would fight each other.
    #[error("switch_port '{0}' appears in more than one server entry")]
    DuplicatePort(String),
}

/// Check a parsed config for semantic problems, collecting every error.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(reason) = url_problem(&config.health_check_url) {
        errors.push(ValidationError::BadUrl {
            url: config.health_check_url.clone(),
            reason,
        });
    }

    if config.health_check_interval == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health_check_timeout == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.switch_host.trim().is_empty() {
        errors.push(ValidationError::EmptySwitchHost);
    }
    if config.switch_user.trim().is_empty() {
        errors.push(ValidationError::EmptySwitchUser);
    }

    let mut seen_ips = HashSet::new();
    let mut seen_ports = HashSet::new();
    for server in &config.servers {
        if server.switch_port.trim().is_empty() {
            errors.push(ValidationError::EmptySwitchPort(server.server_ip.to_string()));
        }
        if !seen_ips.insert(server.server_ip) {
            errors.push(ValidationError::DuplicateServer(server.server_ip.to_string()));
        }
        if !seen_ports.insert(server.switch_port.clone()) {
            errors.push(ValidationError::DuplicatePort(server.switch_port.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Why a URL cannot serve as the health check target, if it cannot.
fn url_problem(raw: &str) -> Option<String> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => return Some(e.to_string()),
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        return Some(format!("scheme '{}' is not http or https", url.scheme()));
    }
    // The probe steers this URL at each server by overriding how its host
    // resolves. An IP literal host is connected to as written, so it would
    // leave every probe on one fixed address.
    match url.host() {
        Some(Host::Domain(_)) => None,
        Some(_) => Some("host is an IP literal; a domain name is required".to_string()),
        None => Some("URL has no host".to_string()),
    }
}
