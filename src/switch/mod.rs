//! Switch control subsystem.
//!
//! # Data Flow
//! ```text
//! refresh():
//!     management API → interface snapshot (one entry per port)
//!
//! comment(port) / is_enabled(port):
//!     snapshot lookup, no wire traffic
//!
//! set_comment(port, text) / enable(port) / disable(port):
//!     wire call against the port's stable identifier
//! ```
//!
//! # Design Decisions
//! - The failover engine drives the `SwitchGateway` trait, never a concrete
//!   client, so an in-memory switch can substitute in tests
//! - Reads answer from the snapshot taken by the cycle's `refresh`; writes
//!   do not patch that snapshot, so it may be stale until the next refresh
//! - Every operation addresses interfaces by name; the concrete client owns
//!   the mapping from name to whatever identifier the wire wants

pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

pub use rest::RestSwitch;

/// Result type alias for gateway operations.
pub type SwitchResult<T> = Result<T, SwitchError>;

/// Errors surfaced by a switch gateway.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// A remote management call failed (connect, auth, timeout, HTTP error).
    #[error("switch unavailable during {operation}: {message}")]
    Unavailable {
        /// The gateway operation that was running.
        operation: &'static str,
        /// Transport-level detail.
        message: String,
    },

    /// The interface name is missing from the current snapshot.
    #[error("interface '{0}' not found on switch")]
    UnknownPort(String),

    /// The management API answered with something unintelligible.
    #[error("unexpected switch response during {operation}: {message}")]
    Protocol {
        /// The gateway operation that was running.
        operation: &'static str,
        /// What was wrong with the payload.
        message: String,
    },
}

impl SwitchError {
    /// Creates an unavailable error for `operation`.
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation,
            message: message.into(),
        }
    }

    /// Creates a protocol error for `operation`.
    pub fn protocol(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Protocol {
            operation,
            message: message.into(),
        }
    }

    /// Returns true when retrying on a later cycle may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SwitchError::Unavailable { .. })
    }
}

/// Capability surface over one managed switch.
///
/// `refresh` must be called once per decision cycle before any read; reads
/// answer from that snapshot and fail with [`SwitchError::UnknownPort`] when
/// the name is absent from it.
#[async_trait]
pub trait SwitchGateway: Send {
    /// Fetch a fresh snapshot of every Ethernet interface.
    async fn refresh(&mut self) -> SwitchResult<()>;

    /// Comment currently on `port`. `None` means the interface carries no
    /// annotation at all, which is distinct from an empty comment.
    fn comment(&self, port: &str) -> SwitchResult<Option<String>>;

    /// Administrative state of `port` as of the last refresh.
    fn is_enabled(&self, port: &str) -> SwitchResult<bool>;

    /// Replace the comment on `port`.
    async fn set_comment(&mut self, port: &str, text: &str) -> SwitchResult<()>;

    /// Administratively enable `port`.
    async fn enable(&mut self, port: &str) -> SwitchResult<()>;

    /// Administratively disable `port`.
    async fn disable(&mut self, port: &str) -> SwitchResult<()>;
}
