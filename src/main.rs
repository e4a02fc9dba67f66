//! Bonding Monitor
//!
//! Watches the members of a bonded uplink with per-server health checks and
//! steers their switch ports: failing servers are taken out of the bond,
//! recovered servers are brought back once their recovery has held.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────┐
//!   │                    BONDING MONITOR                     │
//!   │                                                        │
//!   │   ┌─────────┐  healthy y/n  ┌───────────┐             │
//!   │   │ health  │──────────────▶│  monitor  │             │
//!   │   │ probes  │  per server   │ counters  │             │
//!   │   └─────────┘               └─────┬─────┘             │
//!   │        │                         │ decisions          │
//!   │        │ pinned DNS              ▼                     │
//!   │        ▼                   ┌───────────┐   REST       │
//!   │   monitored servers        │  switch   │──────────▶ managed
//!   │                            │  gateway  │              switch
//!   │                            └───────────┘             │
//!   │                                                        │
//!   │  ┌──────────────────────────────────────────────────┐ │
//!   │  │  config (TOML + env overrides)   lifecycle        │ │
//!   │  │                                  (SIGTERM/SIGINT) │ │
//!   │  └──────────────────────────────────────────────────┘ │
//!   └────────────────────────────────────────────────────────┘
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bonding_monitor::config::{load_config, MonitorConfig};
use bonding_monitor::health::HttpProbe;
use bonding_monitor::lifecycle::{signals, Shutdown};
use bonding_monitor::monitor::{FailoverCoordinator, ServerState};
use bonding_monitor::switch::RestSwitch;

/// Disable and re-enable bonded uplink ports as their servers fail and recover.
#[derive(Debug, Parser)]
#[command(name = "bonding-monitor", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(
        short,
        long,
        default_value = "/etc/bonding-monitor/config.toml",
        env = "BONDING_MONITOR_CONFIG"
    )]
    config: PathBuf,

    /// Server address this instance runs on; may repeat. Matching entries
    /// in the config are skipped so a monitor never steers its own port.
    #[arg(long = "local-ip", env = "BONDING_MONITOR_LOCAL_IP", value_delimiter = ',')]
    local_ip: Vec<IpAddr>,

    /// Enable debug logging.
    #[arg(long, env = "BONDING_MONITOR_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "bonding_monitor=debug"
    } else {
        "bonding_monitor=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(config = %cli.config.display(), "bonding-monitor starting");

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config, cli.local_ip).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "monitor failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    config: MonitorConfig,
    local_ips: Vec<IpAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    let servers: Vec<ServerState> = config
        .servers
        .iter()
        .filter(|entry| {
            let local = local_ips.contains(&entry.server_ip);
            if local {
                tracing::info!(address = %entry.server_ip, "skipping local server");
            }
            !local
        })
        .map(|entry| ServerState::new(entry.server_ip, entry.switch_port.clone()))
        .collect();

    if servers.is_empty() {
        tracing::warn!("no servers left to monitor after excluding local addresses");
    }

    let targets: Vec<IpAddr> = servers.iter().map(|server| server.address).collect();
    let probe = HttpProbe::new(
        &config.health_check_url,
        Duration::from_secs(config.health_check_timeout),
        &targets,
    )?;
    let switch = RestSwitch::new(
        &config.switch_host,
        &config.switch_user,
        &config.switch_password,
    )?;

    let shutdown = Shutdown::new();
    let monitor_shutdown = shutdown.subscribe();
    tokio::spawn(signals::listen(shutdown));

    FailoverCoordinator::new(
        probe,
        switch,
        servers,
        Duration::from_secs(config.health_check_interval),
    )
    .run(monitor_shutdown)
    .await;

    tracing::info!("shutdown complete");
    Ok(())
}
