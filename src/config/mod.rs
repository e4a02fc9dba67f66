//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → BONDING_MONITOR_* environment overrides
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Scalar keys are env-overridable, the server list is file-only
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every problem in one pass

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::MonitorConfig;
pub use schema::ServerEntry;
