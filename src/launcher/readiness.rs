//! Readiness polling.
//!
//! The launched application is considered ready once its port accepts a TCP
//! connection. Polling backs off exponentially and watches the child so a
//! crash during startup is reported instead of waiting out the timeout.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::LauncherConfig;
use crate::shell::{ProcessState, RunningProcess};

/// Upper bound on a single connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// How long and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub timeout: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl ReadinessPolicy {
    pub fn from_config(config: &LauncherConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.readiness_timeout_seconds),
            initial_interval: Duration::from_millis(config.initial_interval_ms),
            max_interval: Duration::from_millis(config.max_interval_ms),
        }
    }

    /// Delay after the given zero-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_interval
            .saturating_mul(factor)
            .min(self.max_interval)
    }
}

/// Result of [`wait_until_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The port accepted a connection.
    Ready { elapsed: Duration },
    /// The deadline passed first.
    TimedOut { waited: Duration },
    /// The child exited first.
    Exited { code: Option<i32> },
}

/// Poll `address` until it accepts connections, the child exits, or the
/// policy's timeout elapses.
pub fn wait_until_ready(
    address: &str,
    process: &mut dyn RunningProcess,
    policy: &ReadinessPolicy,
) -> Readiness {
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match process.state() {
            Ok(ProcessState::Exited(code)) => return Readiness::Exited { code },
            Ok(ProcessState::Running) => {}
            Err(e) => tracing::warn!("Could not query process {}: {}", process.id(), e),
        }

        let elapsed = start.elapsed();
        let remaining = policy.timeout.saturating_sub(elapsed);
        if accepts_connection(address, remaining.min(CONNECT_TIMEOUT)) {
            return Readiness::Ready {
                elapsed: start.elapsed(),
            };
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            return Readiness::TimedOut { waited: elapsed };
        }

        let delay = policy.delay_for(attempt).min(policy.timeout - elapsed);
        tracing::debug!("{} not ready, retrying in {:?}", address, delay);
        thread::sleep(delay);
        attempt = attempt.saturating_add(1);
    }
}

fn accepts_connection(address: &str, timeout: Duration) -> bool {
    if timeout.is_zero() {
        return false;
    }
    let addrs: Vec<SocketAddr> = match address.to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(e) => {
            tracing::debug!("Could not resolve {}: {}", address, e);
            return false;
        }
    };
    addrs
        .iter()
        .any(|addr| TcpStream::connect_timeout(addr, timeout).is_ok())
}
