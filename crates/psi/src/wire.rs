//! Request and response bodies for the PSI JSON endpoints.
//!
//! Requests use camelCase argument names. Dataset rows keep the server's
//! upper-case column names.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use purge_core::types::JobState;

/// The store `ReadProjectStatus` reads from.
pub const WORKING_STORE: &str = "WorkingStore";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// ASMX JSON responses wrap the result in a `d` member.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub d: T,
}

// ---------------------------------------------------------------------------
// Project service
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadProjectStatusRequest<'a> {
    pub project_uid: Uuid,
    pub data_store: &'a str,
    pub project_name: &'a str,
    pub project_type: i32,
}

impl ReadProjectStatusRequest<'_> {
    /// List every project of one type in the working store.
    pub fn all_of_type(project_type: i32) -> Self {
        Self {
            project_uid: Uuid::nil(),
            data_store: WORKING_STORE,
            project_name: "",
            project_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectDataSet {
    #[serde(rename = "Project", default)]
    pub project: Vec<ProjectRow>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRow {
    #[serde(rename = "PROJ_UID")]
    pub proj_uid: Uuid,
    #[serde(rename = "PROJ_NAME")]
    pub proj_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDeleteProjectsRequest {
    pub job_uid: Uuid,
    pub delete_wss_site: bool,
    pub project_uids: Vec<Uuid>,
    /// Removes the draft and the published copy together.
    pub delete_all_versions: bool,
}

// ---------------------------------------------------------------------------
// Archive service
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ArchivedProjectsDataSet {
    #[serde(rename = "Projects", default)]
    pub projects: Vec<ArchivedProjectRow>,
}

#[derive(Debug, Deserialize)]
pub struct ArchivedProjectRow {
    #[serde(rename = "PROJ_UID")]
    pub proj_uid: Uuid,
    #[serde(rename = "PROJ_NAME")]
    pub proj_name: String,
    #[serde(rename = "PROJ_VERSION_UID")]
    pub proj_version_uid: Uuid,
    #[serde(rename = "PROJ_VERSION_DATE")]
    pub proj_version_date: NaiveDateTime,
}

/// How the two identifiers of an archived snapshot are bound to the
/// `QueueDeleteArchivedProject` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveArgOrder {
    /// Version id in `projectUid`, project id in `archivedProjectUid`.
    VersionThenProject,
    /// Project id in `projectUid`, version id in `archivedProjectUid`.
    ProjectThenVersion,
}

/// The server only deletes the snapshot when the version id is sent in the
/// `projectUid` slot. The transposed call is acknowledged as a success but
/// removes nothing.
pub const ARCHIVE_DELETE_ORDER: ArchiveArgOrder = ArchiveArgOrder::VersionThenProject;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDeleteArchivedProjectRequest {
    pub job_uid: Uuid,
    pub project_uid: Uuid,
    pub archived_project_uid: Uuid,
}

impl QueueDeleteArchivedProjectRequest {
    pub fn new(job_uid: Uuid, version_id: Uuid, project_id: Uuid, order: ArchiveArgOrder) -> Self {
        let (project_uid, archived_project_uid) = match order {
            ArchiveArgOrder::VersionThenProject => (version_id, project_id),
            ArchiveArgOrder::ProjectThenVersion => (project_id, version_id),
        };
        Self {
            job_uid,
            project_uid,
            archived_project_uid,
        }
    }
}

// ---------------------------------------------------------------------------
// Queue service
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub job_uid: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCompletion {
    pub state: JobState,
    #[serde(default)]
    pub xml_error: String,
}
