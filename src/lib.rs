//! Bonding Monitor Library

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod monitor;
pub mod switch;

pub use config::schema::MonitorConfig;
pub use lifecycle::Shutdown;
pub use monitor::FailoverCoordinator;
