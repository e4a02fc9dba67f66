//! Per-server probe bookkeeping.

use std::net::IpAddr;

/// One monitored server and its consecutive probe counters.
///
/// The counters are complementary: recording a success zeroes the failure
/// run and extends the success run, and vice versa. After any probe has
/// been recorded exactly one of them is nonzero; both are zero only before
/// the first probe.
#[derive(Debug)]
pub struct ServerState {
    /// Backend address the health check URL is resolved to.
    pub address: IpAddr,
    /// Switch interface this server is wired to.
    pub port: String,
    ok_count: u32,
    fail_count: u32,
}

impl ServerState {
    /// Create the state for one monitored server.
    pub fn new(address: IpAddr, port: impl Into<String>) -> Self {
        Self {
            address,
            port: port.into(),
            ok_count: 0,
            fail_count: 0,
        }
    }

    /// Record one probe outcome.
    pub fn record(&mut self, healthy: bool) {
        if healthy {
            self.fail_count = 0;
            self.ok_count += 1;
        } else {
            self.ok_count = 0;
            self.fail_count += 1;
        }
    }

    /// Consecutive successful checks since the last failure.
    pub fn ok_count(&self) -> u32 {
        self.ok_count
    }

    /// Consecutive failed checks since the last success.
    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn server() -> ServerState {
        ServerState::new(IpAddr::V4(Ipv4Addr::new(10, 0, 1, 11)), "ether3")
    }

    #[test]
    fn test_starts_with_both_counters_zero() {
        let s = server();
        assert_eq!(s.ok_count(), 0);
        assert_eq!(s.fail_count(), 0);
    }

    #[test]
    fn test_success_run_grows_and_clears_failures() {
        let mut s = server();
        s.record(false);
        s.record(true);
        s.record(true);
        assert_eq!(s.ok_count(), 2);
        assert_eq!(s.fail_count(), 0);
    }

    #[test]
    fn test_failure_run_grows_and_clears_successes() {
        let mut s = server();
        s.record(true);
        s.record(false);
        s.record(false);
        s.record(false);
        assert_eq!(s.ok_count(), 0);
        assert_eq!(s.fail_count(), 3);
    }

    #[test]
    fn test_counters_track_trailing_run_for_any_sequence() {
        let outcomes = [true, true, false, true, false, false, false, true, true];
        let mut s = server();
        let mut run = 0u32;

        for (i, &healthy) in outcomes.iter().enumerate() {
            run = if i > 0 && outcomes[i - 1] == healthy {
                run + 1
            } else {
                1
            };
            s.record(healthy);

            // Exactly one counter is nonzero and it equals the trailing run.
            if healthy {
                assert_eq!(s.ok_count(), run);
                assert_eq!(s.fail_count(), 0);
            } else {
                assert_eq!(s.fail_count(), run);
                assert_eq!(s.ok_count(), 0);
            }
        }
    }
}
