//! Configuration loading from disk, with environment overrides.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Prefix shared by every environment variable the monitor reads.
pub const ENV_PREFIX: &str = "BONDING_MONITOR_";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value in {key}: {message}")]
    Env { key: String, message: String },

    #[error("config validation failed: {}", errors_display(.0))]
    Validation(Vec<ValidationError>),
}

fn errors_display(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override, and validate configuration from a TOML file.
///
/// Scalar keys can be overridden through `BONDING_MONITOR_*` environment
/// variables (e.g. `BONDING_MONITOR_SWITCH_PASSWORD`); the server list
/// always comes from the file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: MonitorConfig = toml::from_str(&content)?;

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides through an injectable lookup; tests pass a
/// closure instead of touching the process environment.
fn apply_overrides(
    config: &mut MonitorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

    if let Some(value) = var("HEALTH_CHECK_URL") {
        config.health_check_url = value;
    }
    if let Some(value) = var("SWITCH_HOST") {
        config.switch_host = value;
    }
    if let Some(value) = var("SWITCH_USER") {
        config.switch_user = value;
    }
    if let Some(value) = var("SWITCH_PASSWORD") {
        config.switch_password = value;
    }
    if let Some(value) = var("HEALTH_CHECK_INTERVAL") {
        config.health_check_interval = parse_seconds("HEALTH_CHECK_INTERVAL", &value)?;
    }
    if let Some(value) = var("HEALTH_CHECK_TIMEOUT") {
        config.health_check_timeout = parse_seconds("HEALTH_CHECK_TIMEOUT", &value)?;
    }

    Ok(())
}

fn parse_seconds(suffix: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Env {
        key: format!("{ENV_PREFIX}{suffix}"),
        message: format!("'{value}' is not a whole number of seconds"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_config() -> MonitorConfig {
        toml::from_str(
            r#"
            health_check_url = "https://bond.example.net/healthz"
            health_check_interval = 30
            switch_host = "192.168.88.1"
            switch_user = "monitor"
            switch_password = "secret"

            [[servers]]
            server_ip = "10.0.1.11"
            switch_port = "ether3"
        "#,
        )
        .unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string()))
            .collect()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = base_config();
        let vars = env(&[
            ("SWITCH_PASSWORD", "from-env"),
            ("HEALTH_CHECK_INTERVAL", "5"),
        ]);

        apply_overrides(&mut config, |key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.switch_password, "from-env");
        assert_eq!(config.health_check_interval, 5);
        // Untouched keys keep their file values.
        assert_eq!(config.switch_user, "monitor");
    }

    #[test]
    fn test_no_overrides_leaves_config_alone() {
        let mut config = base_config();
        apply_overrides(&mut config, |_| None).unwrap();
        assert_eq!(config.health_check_interval, 30);
        assert_eq!(config.switch_password, "secret");
    }

    #[test]
    fn test_non_numeric_interval_is_rejected() {
        let mut config = base_config();
        let vars = env(&[("HEALTH_CHECK_INTERVAL", "soon")]);

        let err = apply_overrides(&mut config, |key| vars.get(key).cloned()).unwrap_err();

        match err {
            ConfigError::Env { key, .. } => {
                assert_eq!(key, "BONDING_MONITOR_HEALTH_CHECK_INTERVAL");
            }
            other => panic!("expected Env error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = load_config(Path::new("/nonexistent/bonding-monitor.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
