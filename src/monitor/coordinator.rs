//! The failover decision engine.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::health::HealthProbe;
use crate::monitor::state::ServerState;
use crate::switch::{SwitchGateway, SwitchResult};

/// Comment left on a port this monitor has disabled after failed checks.
pub const FAIL_MARKER: &str = "bonding-monitor health check fail";

/// Comment claiming a port for this monitor's recovery countdown.
pub const PREPARING_MARKER: &str = "bonding-monitor preparing to enable";

/// Consecutive failures before a port is taken out of service.
const DISABLE_THRESHOLD: u32 = 2;

/// Consecutive successes before recovery is proposed by claiming the port.
const PREPARE_THRESHOLD: u32 = 2;

/// Consecutive successes before a claim that survived is acted on.
const ENABLE_THRESHOLD: u32 = 4;

/// Consecutive refresh failures after which even an outage escalates to an
/// alert.
const SWITCH_ALERT_AFTER: u32 = 3;

/// Drives the probe → refresh → decide cycle for every monitored server.
///
/// Owns the per-server counters exclusively; nothing outside the cycle
/// touches them. Collaborators come in through the [`HealthProbe`] and
/// [`SwitchGateway`] traits so tests can substitute both.
pub struct FailoverCoordinator<P, S> {
    probe: P,
    switch: S,
    servers: Vec<ServerState>,
    interval: Duration,
    refresh_failures: u32,
}

impl<P: HealthProbe, S: SwitchGateway> FailoverCoordinator<P, S> {
    /// Assemble the engine from its collaborators.
    pub fn new(probe: P, switch: S, servers: Vec<ServerState>, interval: Duration) -> Self {
        Self {
            probe,
            switch,
            servers,
            interval,
            refresh_failures: 0,
        }
    }

    /// Run decision cycles until the shutdown signal fires.
    ///
    /// The loop has no terminal state of its own; an in-flight cycle always
    /// completes before the signal is observed.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            servers = self.servers.len(),
            interval_secs = self.interval.as_secs(),
            "failover monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        // A slow cycle delays the next tick instead of triggering catch-up
        // bursts; the fixed interval is the only retry mechanism.
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("failover monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One full pass: probe every server, refresh the switch snapshot, then
    /// apply the decision step per server.
    pub async fn run_cycle(&mut self) {
        for server in &mut self.servers {
            let healthy = self.probe.check(server.address).await;
            server.record(healthy);
            tracing::debug!(
                address = %server.address,
                port = %server.port,
                healthy,
                ok = server.ok_count(),
                fail = server.fail_count(),
                "probe recorded"
            );
        }

        if let Err(e) = self.switch.refresh().await {
            self.refresh_failures += 1;
            // An outage gets a grace period before the alert; a malformed
            // answer alerts at once.
            if !e.is_transient() || self.refresh_failures >= SWITCH_ALERT_AFTER {
                tracing::error!(
                    error = %e,
                    consecutive = self.refresh_failures,
                    "switch refresh failing, decisions suspended"
                );
            } else {
                tracing::warn!(error = %e, "switch refresh failed, skipping decisions this cycle");
            }
            return;
        }
        self.refresh_failures = 0;

        for server in &self.servers {
            if let Err(e) = Self::decide(server, &mut self.switch).await {
                tracing::warn!(
                    port = %server.port,
                    error = %e,
                    "decision step failed, port left for next cycle"
                );
            }
        }
    }

    /// The decision step for one server.
    ///
    /// `comment` is read once at the top and holds for the whole step. The
    /// failure path asks `is_enabled` a second time before acting instead
    /// of reusing the answer that gated the branch.
    async fn decide(server: &ServerState, switch: &mut S) -> SwitchResult<()> {
        let port = server.port.as_str();
        let comment = switch.comment(port)?;

        if server.fail_count() >= DISABLE_THRESHOLD && switch.is_enabled(port)? {
            if comment.as_deref() != Some(FAIL_MARKER) {
                switch.set_comment(port, FAIL_MARKER).await?;
            }
            if switch.is_enabled(port)? {
                tracing::warn!(
                    port,
                    failures = server.fail_count(),
                    "health checks failing, disabling port"
                );
                switch.disable(port).await?;
            }
        } else if server.ok_count() >= PREPARE_THRESHOLD && !switch.is_enabled(port)? {
            // A disabled port with no comment at all was taken out by hand;
            // those are never brought back automatically.
            let Some(comment) = comment else {
                return Ok(());
            };

            if comment != PREPARING_MARKER {
                tracing::info!(
                    port,
                    successes = server.ok_count(),
                    "server recovered, claiming port for re-enable"
                );
                switch.set_comment(port, PREPARING_MARKER).await?;
            } else if server.ok_count() >= ENABLE_THRESHOLD {
                // The claim survived two further successful cycles without
                // another monitor overwriting it.
                tracing::info!(port, successes = server.ok_count(), "re-enabling port");
                switch.enable(port).await?;
                switch.set_comment(port, "").await?;
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn switch_mut(&mut self) -> &mut S {
        &mut self.switch
    }
}
