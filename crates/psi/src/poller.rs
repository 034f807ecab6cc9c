//! Waiting for queued PSI jobs to finish.
//!
//! [`JobPoller::wait_for_job`] drives one job through
//! `Submitted -> Polling -> {Succeeded, Failed}`:
//!
//! 1. Ask the queue for its wait estimate and sleep for it, capped at
//!    [`PollerConfig::max_wait`].
//! 2. Read the job state. `Success` ends the wait; a terminal failure is
//!    reported and ends the wait without an error.
//! 3. Anything else is still in progress: report it, remind the user every
//!    [`PollerConfig::reminder_every`] polls, sleep again and go back to 2.
//!
//! There is no overall timeout. Only remote errors end the wait early.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use purge_core::types::JobState;

use crate::api::PsiApiError;
use crate::server::ProjectServer;

/// Upper bound on a single sleep between status checks.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(10);

/// Number of consecutive in-progress polls between interrupt reminders.
pub const DEFAULT_REMINDER_EVERY: u32 = 10;

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Something that can pause the poller.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Receives the user-visible progress of a job.
pub trait PollReporter {
    /// The job is still running after `polls` status checks.
    fn in_progress(&mut self, job: Uuid, state: JobState, polls: u32);

    /// Periodic hint that the wait can be interrupted.
    fn reminder(&mut self, job: Uuid, polls: u32);

    /// The job reached a terminal failure state.
    fn failed(&mut self, job: Uuid, state: JobState, diagnostic: Option<&str>);
}

// ---------------------------------------------------------------------------
// Config and outcome
// ---------------------------------------------------------------------------

/// Tunable parameters for the polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub max_wait: Duration,
    /// `0` disables reminders.
    pub reminder_every: u32,
    pub is_terminal_failure: fn(JobState) -> bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            reminder_every: DEFAULT_REMINDER_EVERY,
            is_terminal_failure: JobState::is_terminal_failure,
        }
    }
}

/// How a waited-on job ended. `polls` counts the in-progress states seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded {
        polls: u32,
    },
    Failed {
        state: JobState,
        polls: u32,
        diagnostic: Option<String>,
    },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }
}

/// Clamp the server's wait estimate into `0..=max_wait`.
pub fn capped_wait(estimate_secs: i64, max_wait: Duration) -> Duration {
    let secs = u64::try_from(estimate_secs).unwrap_or(0);
    Duration::from_secs(secs).min(max_wait)
}

// ---------------------------------------------------------------------------
// JobPoller
// ---------------------------------------------------------------------------

pub struct JobPoller<'a, S: ?Sized> {
    server: &'a S,
    sleeper: &'a dyn Sleeper,
    config: PollerConfig,
}

impl<'a, S> JobPoller<'a, S>
where
    S: ProjectServer + ?Sized,
{
    pub fn new(server: &'a S, sleeper: &'a dyn Sleeper, config: PollerConfig) -> Self {
        Self {
            server,
            sleeper,
            config,
        }
    }

    /// Block until `job` succeeds or fails.
    ///
    /// A failed job is an `Ok` outcome; `Err` means the queue itself could
    /// not be queried.
    pub async fn wait_for_job(
        &self,
        job: Uuid,
        reporter: &mut dyn PollReporter,
    ) -> Result<JobOutcome, PsiApiError> {
        self.pause(job).await?;

        let mut polls = 0u32;
        loop {
            let (state, diagnostic) = self.server.job_state(job).await?;

            if state.is_success() {
                tracing::info!(%job, polls, "Queue job succeeded");
                return Ok(JobOutcome::Succeeded { polls });
            }

            if (self.config.is_terminal_failure)(state) {
                tracing::warn!(%job, %state, polls, "Queue job failed");
                reporter.failed(job, state, diagnostic.as_deref());
                return Ok(JobOutcome::Failed {
                    state,
                    polls,
                    diagnostic,
                });
            }

            polls += 1;
            tracing::debug!(%job, %state, polls, "Queue job still running");
            reporter.in_progress(job, state, polls);
            if self.config.reminder_every > 0 && polls % self.config.reminder_every == 0 {
                reporter.reminder(job, polls);
            }

            self.pause(job).await?;
        }
    }

    async fn pause(&self, job: Uuid) -> Result<(), PsiApiError> {
        let estimate = self.server.job_wait_seconds(job).await?;
        let wait = capped_wait(estimate, self.config.max_wait);
        self.sleeper.sleep(wait).await;
        Ok(())
    }
}
