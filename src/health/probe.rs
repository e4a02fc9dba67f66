//! Health probing against per-server addresses.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::{Host, Url};

/// Error type for probe construction.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The health check URL did not parse.
    #[error("health check url '{url}' is invalid: {source}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The health check URL has no hostname to pin.
    #[error("health check url '{0}' has no host")]
    MissingHost(String),

    /// The health check URL has an IP literal host, which cannot be pinned.
    #[error("health check url '{0}' has an IP literal host; a hostname is required")]
    IpLiteralHost(String),

    /// A per-target HTTP client could not be built.
    #[error("failed to build probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Outcome-only reachability check.
///
/// Implementations collapse every failure mode into `false`; callers never
/// learn why a check failed, only that it did.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Check the configured endpoint as served by `target`.
    async fn check(&self, target: IpAddr) -> bool;
}

/// HTTP(S) probe that re-points one fixed URL at each backend.
///
/// A client is pre-built per target with the URL's host pinned to that
/// address, so each request connects to the backend directly while the
/// hostname still supplies the Host header and TLS identity. The URL's own
/// port carries over unchanged.
#[derive(Debug)]
pub struct HttpProbe {
    url: Url,
    clients: HashMap<IpAddr, Client>,
}

impl HttpProbe {
    /// Build a probe for `url` against the given targets.
    ///
    /// The URL must name its host by domain; construction fails on an IP
    /// literal host, since requests to a literal connect to that address
    /// no matter what the resolver says.
    pub fn new(url: &str, timeout: Duration, targets: &[IpAddr]) -> Result<Self, ProbeError> {
        let parsed = Url::parse(url).map_err(|source| ProbeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let host = match parsed.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(_) => return Err(ProbeError::IpLiteralHost(url.to_string())),
            None => return Err(ProbeError::MissingHost(url.to_string())),
        };

        let mut clients = HashMap::with_capacity(targets.len());
        for &target in targets {
            // The pinned address only supplies the IP; the port to connect
            // to still comes from the URL.
            let client = Client::builder()
                .resolve(&host, SocketAddr::new(target, 0))
                .timeout(timeout)
                .user_agent("bonding-monitor/0.1")
                .build()?;
            clients.insert(target, client);
        }

        Ok(Self {
            url: parsed,
            clients,
        })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self, target: IpAddr) -> bool {
        let Some(client) = self.clients.get(&target) else {
            tracing::error!(%target, "no probe client for target");
            return false;
        };

        match client.get(self.url.clone()).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                if !healthy {
                    tracing::warn!(
                        %target,
                        status = %response.status(),
                        "health check failed: non-success status"
                    );
                }
                healthy
            }
            Err(e) => {
                tracing::warn!(%target, error = %e, "health check failed: request error");
                false
            }
        }
    }
}
