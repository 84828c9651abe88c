use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{DeploymentHandle, DeploymentResult, ProvisioningState};
use crate::error::{DeployError, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Polling configuration
#[derive(Clone, Debug)]
pub struct WaitConfig {
    pub poll_interval: Duration,
    /// Give up after this long. `None` polls until a terminal state.
    pub timeout: Option<Duration>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl WaitConfig {
    /// Length of the next sleep, never past the deadline
    fn next_delay(&self, elapsed: Duration) -> Duration {
        match self.timeout {
            Some(timeout) => self.poll_interval.min(timeout.saturating_sub(elapsed)),
            None => self.poll_interval,
        }
    }
}

/// Progress notification for a poll that saw the deployment running
#[derive(Debug, Clone)]
pub struct PollUpdate<'a> {
    pub deployment: &'a str,
    /// 1-based count of in-progress observations
    pub poll: u32,
    pub elapsed: Duration,
}

pub trait ProgressSink {
    fn in_progress(&mut self, update: &PollUpdate<'_>);
}

impl<F> ProgressSink for F
where
    F: FnMut(&PollUpdate<'_>),
{
    fn in_progress(&mut self, update: &PollUpdate<'_>) {
        self(update)
    }
}

pub struct DeploymentWaiter {
    config: WaitConfig,
}

impl DeploymentWaiter {
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    /// Poll until the deployment reaches a terminal state, then fetch its
    /// result. Blocks the calling thread; the only way to stop early is the
    /// configured timeout, which leaves the remote deployment running.
    pub fn await_completion(
        &self,
        handle: &DeploymentHandle<'_>,
        progress: &mut dyn ProgressSink,
    ) -> Result<DeploymentResult> {
        let started = Instant::now();
        let mut in_progress_polls = 0u32;

        loop {
            let state = handle.status()?;
            if state.is_terminal() {
                info!(deployment = %handle.name(), state = %state, "Deployment finished");
                break;
            }

            let elapsed = started.elapsed();
            if state == ProvisioningState::InProgress {
                in_progress_polls += 1;
                progress.in_progress(&PollUpdate {
                    deployment: handle.name(),
                    poll: in_progress_polls,
                    elapsed,
                });
            } else {
                debug!(deployment = %handle.name(), state = %state, "Deployment not started yet");
            }

            if let Some(timeout) = self.config.timeout {
                if elapsed >= timeout {
                    return Err(DeployError::Timeout {
                        name: handle.name().to_string(),
                        elapsed,
                    });
                }
            }

            thread::sleep(self.config.next_delay(elapsed));
        }

        handle.result()
    }
}
