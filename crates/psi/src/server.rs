//! The remote operations the deletion workflow depends on.
//!
//! [`ProjectServer`] is the seam between the workflow and the network.
//! [`PsiApi`] implements it over HTTP; tests substitute scripted fakes.

use async_trait::async_trait;
use uuid::Uuid;

use purge_core::types::{ArchivedProjectRecord, JobState, ProjectCategory, ProjectRecord};

use crate::api::{PsiApi, PsiApiError, PsiService};
use crate::wire::{
    ArchivedProjectsDataSet, JobCompletion, JobRequest, ProjectDataSet,
    QueueDeleteArchivedProjectRequest, QueueDeleteProjectsRequest, ReadProjectStatusRequest,
    ARCHIVE_DELETE_ORDER,
};

#[async_trait]
pub trait ProjectServer: Send + Sync {
    /// All standard-store projects of one category.
    async fn list_projects(&self, category: ProjectCategory)
        -> Result<Vec<ProjectRecord>, PsiApiError>;

    /// Every archived snapshot on the server.
    async fn list_archived_projects(&self) -> Result<Vec<ArchivedProjectRecord>, PsiApiError>;

    /// Queue deletion of standard-store projects under `job`.
    async fn submit_standard_delete(
        &self,
        job: Uuid,
        delete_workspace: bool,
        project_ids: &[Uuid],
    ) -> Result<(), PsiApiError>;

    /// Queue deletion of one archived snapshot under `job`.
    async fn submit_archive_delete(
        &self,
        job: Uuid,
        version_id: Uuid,
        project_id: Uuid,
    ) -> Result<(), PsiApiError>;

    /// The queue's estimate, in seconds, of how long `job` will take.
    async fn job_wait_seconds(&self, job: Uuid) -> Result<i64, PsiApiError>;

    /// Current state of `job` plus the server's diagnostic text, if any.
    async fn job_state(&self, job: Uuid) -> Result<(JobState, Option<String>), PsiApiError>;
}

#[async_trait]
impl ProjectServer for PsiApi {
    async fn list_projects(
        &self,
        category: ProjectCategory,
    ) -> Result<Vec<ProjectRecord>, PsiApiError> {
        let request = ReadProjectStatusRequest::all_of_type(category.project_type_code());
        let dataset: ProjectDataSet = self
            .call(PsiService::Project, "ReadProjectStatus", &request)
            .await?;

        tracing::debug!(
            category = category.label(),
            rows = dataset.project.len(),
            "Read project table"
        );

        Ok(dataset
            .project
            .into_iter()
            .map(|row| ProjectRecord {
                name: row.proj_name,
                project_id: row.proj_uid,
                category,
            })
            .collect())
    }

    async fn list_archived_projects(&self) -> Result<Vec<ArchivedProjectRecord>, PsiApiError> {
        let dataset: ArchivedProjectsDataSet = self
            .call(
                PsiService::Archive,
                "ReadArchivedProjectsList",
                &serde_json::json!({}),
            )
            .await?;

        tracing::debug!(rows = dataset.projects.len(), "Read archive table");

        Ok(dataset
            .projects
            .into_iter()
            .map(|row| ArchivedProjectRecord {
                name: row.proj_name,
                project_id: row.proj_uid,
                version_id: row.proj_version_uid,
                version_date: row.proj_version_date,
            })
            .collect())
    }

    async fn submit_standard_delete(
        &self,
        job: Uuid,
        delete_workspace: bool,
        project_ids: &[Uuid],
    ) -> Result<(), PsiApiError> {
        let request = QueueDeleteProjectsRequest {
            job_uid: job,
            delete_wss_site: delete_workspace,
            project_uids: project_ids.to_vec(),
            delete_all_versions: true,
        };
        self.call(PsiService::Project, "QueueDeleteProjects", &request)
            .await
    }

    async fn submit_archive_delete(
        &self,
        job: Uuid,
        version_id: Uuid,
        project_id: Uuid,
    ) -> Result<(), PsiApiError> {
        let request =
            QueueDeleteArchivedProjectRequest::new(job, version_id, project_id, ARCHIVE_DELETE_ORDER);
        self.call(PsiService::Archive, "QueueDeleteArchivedProject", &request)
            .await
    }

    async fn job_wait_seconds(&self, job: Uuid) -> Result<i64, PsiApiError> {
        self.call(
            PsiService::QueueSystem,
            "GetJobWaitTime",
            &JobRequest { job_uid: job },
        )
        .await
    }

    async fn job_state(&self, job: Uuid) -> Result<(JobState, Option<String>), PsiApiError> {
        let completion: JobCompletion = self
            .call(
                PsiService::QueueSystem,
                "GetJobCompletionState",
                &JobRequest { job_uid: job },
            )
            .await?;

        let diagnostic = Some(completion.xml_error).filter(|text| !text.trim().is_empty());
        Ok((completion.state, diagnostic))
    }
}
