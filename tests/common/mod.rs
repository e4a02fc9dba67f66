//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use bonding_monitor::switch::{SwitchError, SwitchGateway, SwitchResult};

const RESPONSE_OK: &str = "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";
const RESPONSE_UNAVAILABLE: &str =
    "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndown";

/// Start a health endpoint that always answers 200.
pub async fn start_health_endpoint(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = socket.write_all(RESPONSE_OK.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a health endpoint whose status follows the shared flag.
pub async fn start_toggleable_endpoint(addr: SocketAddr, healthy: Arc<AtomicBool>) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let healthy = healthy.clone();
                    tokio::spawn(async move {
                        let response = if healthy.load(Ordering::SeqCst) {
                            RESPONSE_OK
                        } else {
                            RESPONSE_UNAVAILABLE
                        };
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start an endpoint that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_endpoint(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Port state as the fake switch tracks it.
#[derive(Debug, Clone)]
pub struct PortState {
    pub enabled: bool,
    pub comment: Option<String>,
}

/// In-memory switch shared between a test and the coordinator under test.
///
/// Clones share the same port table, so the test keeps a handle for
/// assertions and mid-test meddling while the coordinator owns another.
#[derive(Clone, Default)]
pub struct FakeSwitch {
    ports: Arc<Mutex<HashMap<String, PortState>>>,
}

impl FakeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_port(&self, name: &str, enabled: bool, comment: Option<&str>) {
        self.ports.lock().unwrap().insert(
            name.to_string(),
            PortState {
                enabled,
                comment: comment.map(String::from),
            },
        );
    }

    pub fn port(&self, name: &str) -> PortState {
        self.ports.lock().unwrap()[name].clone()
    }

    /// Replace a port comment behind the coordinator's back, the way a
    /// second monitor process would.
    #[allow(dead_code)]
    pub fn overwrite_comment(&self, name: &str, comment: &str) {
        self.ports.lock().unwrap().get_mut(name).unwrap().comment = Some(comment.to_string());
    }
}

#[async_trait]
impl SwitchGateway for FakeSwitch {
    async fn refresh(&mut self) -> SwitchResult<()> {
        Ok(())
    }

    fn comment(&self, port: &str) -> SwitchResult<Option<String>> {
        self.ports
            .lock()
            .unwrap()
            .get(port)
            .map(|p| p.comment.clone())
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))
    }

    fn is_enabled(&self, port: &str) -> SwitchResult<bool> {
        self.ports
            .lock()
            .unwrap()
            .get(port)
            .map(|p| p.enabled)
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))
    }

    async fn set_comment(&mut self, port: &str, text: &str) -> SwitchResult<()> {
        let mut ports = self.ports.lock().unwrap();
        let state = ports
            .get_mut(port)
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))?;
        state.comment = Some(text.to_string());
        Ok(())
    }

    async fn enable(&mut self, port: &str) -> SwitchResult<()> {
        let mut ports = self.ports.lock().unwrap();
        let state = ports
            .get_mut(port)
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))?;
        state.enabled = true;
        Ok(())
    }

    async fn disable(&mut self, port: &str) -> SwitchResult<()> {
        let mut ports = self.ports.lock().unwrap();
        let state = ports
            .get_mut(port)
            .ok_or_else(|| SwitchError::UnknownPort(port.to_string()))?;
        state.enabled = false;
        Ok(())
    }
}
