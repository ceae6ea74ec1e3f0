//! Driving loop.
//!
//! One long-lived task per process: sample, dispatch, sleep, repeat. The
//! capability gate is checked once before entering the running state; a
//! denied gate is a normal stop, not an error. Both waits inside a cycle
//! race against the shutdown signal, so cancellation never sits out a
//! window.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::platform::Platform;
use crate::reporter::Reporter;
use crate::sampler::Sampler;

/// Fixed throughput sampling window.
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(60);

/// Fixed delay between the end of one cycle and the start of the next.
///
/// The window compounds into the period: a cycle takes
/// `SAMPLE_WINDOW + CYCLE_DELAY`, it is not a fixed cadence.
pub const CYCLE_DELAY: Duration = Duration::from_secs(60);

/// Terminal states of the driving loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Running,
    Stopped,
}

/// The sampling loop: owns the sampler and the reporter, runs until the
/// shutdown signal flips.
pub struct Agent<P: Platform> {
    sampler: Sampler<P>,
    reporter: Reporter,
    shutdown: watch::Receiver<bool>,
    window: Duration,
    cycle_delay: Duration,
}

impl<P: Platform> Agent<P> {
    pub fn new(sampler: Sampler<P>, reporter: Reporter, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            sampler,
            reporter,
            shutdown,
            window: SAMPLE_WINDOW,
            cycle_delay: CYCLE_DELAY,
        }
    }

    /// Override the fixed cycle timing. Meant for tests that need
    /// sub-second cycles; the binary always runs the defaults.
    pub fn with_timing(mut self, window: Duration, cycle_delay: Duration) -> Self {
        self.window = window;
        self.cycle_delay = cycle_delay;
        self
    }

    /// Run the loop to completion. Always ends in [`AgentState::Stopped`].
    ///
    /// At most one sampling cycle executes at a time; delivery of the
    /// previous snapshot may still be in flight while the next cycle
    /// samples, but is never awaited here.
    pub async fn run(mut self) -> AgentState {
        if !self.sampler.platform().capabilities_granted() {
            warn!("required capabilities not granted; agent will not start");
            return AgentState::Stopped;
        }

        info!(
            window_secs = self.window.as_secs_f64(),
            cycle_delay_secs = self.cycle_delay.as_secs_f64(),
            endpoint = %self.reporter.endpoint(),
            "agent running"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                snapshot = self.sampler.sample(self.window) => {
                    self.reporter.dispatch(snapshot);
                }
            }

            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = tokio::time::sleep(self.cycle_delay) => {}
            }
        }

        info!("agent stopped");
        AgentState::Stopped
    }
}
