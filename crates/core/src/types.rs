//! Shared domain records read from the project server.
//!
//! Every record here is read once per run and never written back, so all
//! types are plain owned values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Project categories
// ---------------------------------------------------------------------------

/// Category of a project in the standard (draft/published) store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    Standard,
    Master,
    Lightweight,
    Inserted,
}

impl ProjectCategory {
    /// Order in which the standard-store tables are searched. The first
    /// table containing a name wins.
    pub const SEARCH_ORDER: [ProjectCategory; 4] = [
        ProjectCategory::Standard,
        ProjectCategory::Master,
        ProjectCategory::Lightweight,
        ProjectCategory::Inserted,
    ];

    /// Numeric project type code used by the remote `ReadProjectStatus` call.
    pub fn project_type_code(self) -> i32 {
        match self {
            ProjectCategory::Standard => 0,
            ProjectCategory::Inserted => 2,
            ProjectCategory::Master => 3,
            ProjectCategory::Lightweight => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectCategory::Standard => "standard",
            ProjectCategory::Master => "master",
            ProjectCategory::Lightweight => "lightweight",
            ProjectCategory::Inserted => "inserted",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of a standard-store project table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub name: String,
    pub project_id: Uuid,
    pub category: ProjectCategory,
}

/// One archived snapshot of a project.
///
/// Several rows may share a `name`, and snapshots of the same project are
/// reported by the server with the same `version_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedProjectRecord {
    pub name: String,
    pub project_id: Uuid,
    pub version_id: Uuid,
    pub version_date: NaiveDateTime,
}

/// A project (or archived snapshot) selected for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDeletionTarget {
    /// Name as stored on the server, not as typed in the input file.
    pub name: String,
    pub project_id: Uuid,
    /// Present only for archive-store targets.
    pub version_id: Option<Uuid>,
}

/// Counters reported before the deletion prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Non-blank candidate names read from the input.
    pub input_lines: usize,
    pub not_found: usize,
    /// Archived snapshots excluded because they are the latest of their group.
    pub kept_latest: usize,
    /// Number of rows in the table(s) the names were resolved against.
    pub table_size: usize,
}

// ---------------------------------------------------------------------------
// Job states
// ---------------------------------------------------------------------------

/// State of an asynchronous job in the remote queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    Unknown,
    ReadyForProcessing,
    SendIncomplete,
    Processing,
    Success,
    Failed,
    FailedNotBlocking,
    ProcessingDeferred,
    CorrelationBlocked,
    Canceled,
    OnHold,
    Sleeping,
    ReadyForLaunch,
}

impl JobState {
    pub fn is_success(self) -> bool {
        self == JobState::Success
    }

    /// States after which the job will never succeed.
    pub fn is_terminal_failure(self) -> bool {
        matches!(
            self,
            JobState::Unknown
                | JobState::Failed
                | JobState::FailedNotBlocking
                | JobState::CorrelationBlocked
                | JobState::Canceled
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_order_is_standard_master_lightweight_inserted() {
        assert_eq!(
            ProjectCategory::SEARCH_ORDER,
            [
                ProjectCategory::Standard,
                ProjectCategory::Master,
                ProjectCategory::Lightweight,
                ProjectCategory::Inserted,
            ]
        );
    }

    #[test]
    fn project_type_codes_are_distinct() {
        let mut codes: Vec<i32> = ProjectCategory::SEARCH_ORDER
            .iter()
            .map(|c| c.project_type_code())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn terminal_failure_states() {
        for state in [
            JobState::Unknown,
            JobState::Failed,
            JobState::FailedNotBlocking,
            JobState::CorrelationBlocked,
            JobState::Canceled,
        ] {
            assert!(state.is_terminal_failure(), "{state} should be terminal");
            assert!(!state.is_success());
        }
    }

    #[test]
    fn in_progress_states_are_not_terminal() {
        for state in [
            JobState::ReadyForProcessing,
            JobState::SendIncomplete,
            JobState::Processing,
            JobState::ProcessingDeferred,
            JobState::OnHold,
            JobState::Sleeping,
            JobState::ReadyForLaunch,
        ] {
            assert!(!state.is_terminal_failure());
            assert!(!state.is_success());
        }
    }

    #[test]
    fn success_is_not_a_failure() {
        assert!(JobState::Success.is_success());
        assert!(!JobState::Success.is_terminal_failure());
    }

    #[test]
    fn job_state_display_uses_remote_name() {
        assert_eq!(JobState::FailedNotBlocking.to_string(), "FailedNotBlocking");
    }
}
