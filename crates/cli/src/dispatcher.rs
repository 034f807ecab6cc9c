//! Sequential submission of delete jobs.
//!
//! Each target gets its own job id and one mutating call. With `wait`, the
//! next submission starts only after the previous job finished. A failed
//! job is counted and the batch carries on; a remote error stops it.

use uuid::Uuid;

use purge_core::types::ResolvedDeletionTarget;
use purge_psi::poller::{JobOutcome, JobPoller, PollerConfig, Sleeper};
use purge_psi::server::ProjectServer;

use crate::console::Console;
use crate::error::RunError;

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Also remove workspace sites. Only applies to standard-store targets.
    pub delete_workspace_sites: bool,
    pub wait: bool,
}

/// Counters for one dispatch pass. `succeeded` and `failed` stay at zero
/// unless jobs were waited on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct Dispatcher<'a, S: ?Sized> {
    server: &'a S,
    sleeper: &'a dyn Sleeper,
    poller: PollerConfig,
    options: DispatchOptions,
}

impl<'a, S> Dispatcher<'a, S>
where
    S: ProjectServer + ?Sized,
{
    pub fn new(
        server: &'a S,
        sleeper: &'a dyn Sleeper,
        poller: PollerConfig,
        options: DispatchOptions,
    ) -> Self {
        Self {
            server,
            sleeper,
            poller,
            options,
        }
    }

    /// Submit one delete job per target, in order.
    pub async fn dispatch(
        &self,
        targets: &[ResolvedDeletionTarget],
        console: &mut Console,
    ) -> Result<DispatchSummary, RunError> {
        let mut summary = DispatchSummary::default();
        let total = targets.len();

        for (index, target) in targets.iter().enumerate() {
            console.line(format_args!("({} of {}) {}", index + 1, total, target.name));

            let job = Uuid::new_v4();
            self.submit(job, target).await?;
            summary.submitted += 1;

            tracing::info!(%job, project = %target.name, archived = target.version_id.is_some(), "Queued delete");
            console.line(format_args!("Queued delete for: {}", target.name));

            if self.options.wait {
                let poller = JobPoller::new(self.server, self.sleeper, self.poller);
                match poller.wait_for_job(job, console).await? {
                    JobOutcome::Succeeded { .. } => summary.succeeded += 1,
                    JobOutcome::Failed { .. } => summary.failed += 1,
                }
            }
        }

        Ok(summary)
    }

    async fn submit(&self, job: Uuid, target: &ResolvedDeletionTarget) -> Result<(), RunError> {
        match target.version_id {
            Some(version_id) => {
                self.server
                    .submit_archive_delete(job, version_id, target.project_id)
                    .await?
            }
            None => {
                self.server
                    .submit_standard_delete(
                        job,
                        self.options.delete_workspace_sites,
                        &[target.project_id],
                    )
                    .await?
            }
        }
        Ok(())
    }
}
