//! RouterOS REST client.
//!
//! Speaks the RouterOS v7 REST API over HTTPS with basic auth. The five
//! gateway operations map onto `/rest/interface/ethernet`: one `GET` for the
//! snapshot, `PATCH` on an entry for comments, and the `enable`/`disable`
//! command endpoints for admin state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{SwitchError, SwitchGateway, SwitchResult};

/// Per-request cap on management calls; the retry policy is simply the
/// monitor's next cycle.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One `/interface/ethernet` entry as RouterOS reports it.
///
/// RouterOS encodes every value as a string and omits the `comment` key
/// entirely when the interface has never been annotated.
#[derive(Debug, Clone, Deserialize)]
struct EthernetEntry {
    #[serde(rename = ".id")]
    id: String,
    name: String,
    disabled: String,
    #[serde(default)]
    comment: Option<String>,
}

impl EthernetEntry {
    fn enabled(&self) -> bool {
        self.disabled == "false"
    }
}

/// Switch gateway speaking the RouterOS v7 REST API.
///
/// Writes address interfaces by RouterOS's internal `.id`, resolved from the
/// interface name through the current snapshot; name and id are never
/// assumed interchangeable on the wire.
pub struct RestSwitch {
    client: Client,
    base_url: String,
    user: String,
    password: String,
    interfaces: Vec<EthernetEntry>,
}

impl RestSwitch {
    /// Build a client for the management API at `host`.
    ///
    /// The snapshot starts empty; callers refresh before reading.
    pub fn new(host: &str, user: &str, password: &str) -> SwitchResult<Self> {
        // RouterOS devices present self-signed certificates out of the box.
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| SwitchError::unavailable("connect", e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("https://{host}/rest/interface/ethernet"),
            user: user.to_string(),
            password: password.to_string(),
            interfaces: Vec::new(),
        })
    }

    fn entry(&self, port: &str) -> SwitchResult<&EthernetEntry> {
        self.interfaces
            .iter()
            .find(|e| e.name == port)
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))
    }

    fn expect_success(operation: &'static str, status: StatusCode) -> SwitchResult<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(SwitchError::unavailable(operation, format!("status {status}")))
        }
    }

    /// Run the `enable` or `disable` command against a port's `.id`.
    async fn set_admin_state(&self, port: &str, command: &'static str) -> SwitchResult<()> {
        let id = self.entry(port)?.id.clone();
        let response = self
            .client
            .post(format!("{}/{command}", self.base_url))
            .basic_auth(&self.user, Some(&self.password))
            .json(&json!({ "numbers": id }))
            .send()
            .await
            .map_err(|e| SwitchError::unavailable(command, e.to_string()))?;

        Self::expect_success(command, response.status())
    }
}

#[async_trait]
impl SwitchGateway for RestSwitch {
    async fn refresh(&mut self) -> SwitchResult<()> {
        let response = self
            .client
            .get(&self.base_url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
            .map_err(|e| SwitchError::unavailable("refresh", e.to_string()))?;

        if !response.status().is_success() {
            return Err(SwitchError::unavailable(
                "refresh",
                format!("status {}", response.status()),
            ));
        }

        self.interfaces = response
            .json()
            .await
            .map_err(|e| SwitchError::protocol("refresh", e.to_string()))?;

        tracing::debug!(interfaces = self.interfaces.len(), "switch snapshot refreshed");
        Ok(())
    }

    fn comment(&self, port: &str) -> SwitchResult<Option<String>> {
        Ok(self.entry(port)?.comment.clone())
    }

    fn is_enabled(&self, port: &str) -> SwitchResult<bool> {
        Ok(self.entry(port)?.enabled())
    }

    async fn set_comment(&mut self, port: &str, text: &str) -> SwitchResult<()> {
        let id = self.entry(port)?.id.clone();
        let response = self
            .client
            .patch(format!("{}/{id}", self.base_url))
            .basic_auth(&self.user, Some(&self.password))
            .json(&json!({ "comment": text }))
            .send()
            .await
            .map_err(|e| SwitchError::unavailable("set-comment", e.to_string()))?;

        Self::expect_success("set-comment", response.status())
    }

    async fn enable(&mut self, port: &str) -> SwitchResult<()> {
        self.set_admin_state(port, "enable").await
    }

    async fn disable(&mut self, port: &str) -> SwitchResult<()> {
        self.set_admin_state(port, "disable").await
    }
}
