//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → current cycle completes → loop exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Shutdown fans out over a broadcast channel
//! - No forced-exit deadline: a cycle is short and always runs to completion

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
