//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! one configured URL
//!     → HttpProbe (per-target client, host pinned to that address)
//!     → GET with bounded timeout
//!     → bool: 2xx on time, or not
//! ```
//!
//! # Design Decisions
//! - Every failure mode (connect error, timeout, TLS, non-2xx) collapses to
//!   a single unhealthy outcome; the failover engine only needs reachable
//!   or not
//! - Resolution is pinned per target client, never process-wide, so the one
//!   URL can fan out to N backends while keeping its hostname for the Host
//!   header and TLS identity

pub mod probe;

pub use probe::{HealthProbe, HttpProbe, ProbeError};
