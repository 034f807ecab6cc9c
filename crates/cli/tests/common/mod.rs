use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use purge_cli::console::Console;
use purge_core::types::{ArchivedProjectRecord, JobState, ProjectCategory, ProjectRecord};
use purge_psi::api::PsiApiError;
use purge_psi::fault::RemoteFault;
use purge_psi::poller::Sleeper;
use purge_psi::server::ProjectServer;

/// A remote call observed by [`FakeServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StandardDelete {
        job: Uuid,
        delete_workspace: bool,
        project_ids: Vec<Uuid>,
    },
    ArchiveDelete {
        job: Uuid,
        version_id: Uuid,
        project_id: Uuid,
    },
    WaitTime(Uuid),
    State(Uuid),
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(self, Call::StandardDelete { .. } | Call::ArchiveDelete { .. })
    }
}

/// In-memory project server with scripted queue states.
#[derive(Default)]
pub struct FakeServer {
    pub tables: HashMap<ProjectCategory, Vec<ProjectRecord>>,
    pub archive: Vec<ArchivedProjectRecord>,
    /// States handed out by `job_state`, across all jobs. Empty means success.
    pub states: Mutex<VecDeque<JobState>>,
    /// Zero-based submission index that answers with a fault.
    pub fault_on_submission: Option<usize>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeServer {
    pub fn with_projects(category: ProjectCategory, names: &[&str]) -> Self {
        let mut server = Self::default();
        server.add_projects(category, names);
        server
    }

    pub fn add_projects(&mut self, category: ProjectCategory, names: &[&str]) {
        let rows = self.tables.entry(category).or_default();
        rows.extend(names.iter().map(|name| ProjectRecord {
            name: name.to_string(),
            project_id: Uuid::new_v4(),
            category,
        }));
    }

    pub fn project_id(&self, name: &str) -> Uuid {
        self.tables
            .values()
            .flatten()
            .find(|row| row.name == name)
            .map(|row| row.project_id)
            .unwrap()
    }

    pub fn script_states(&self, states: &[JobState]) {
        self.states.lock().unwrap().extend(states.iter().copied());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    fn record_submission(&self, call: Call) -> Result<(), PsiApiError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.iter().filter(|c| c.is_mutating()).count();
        calls.push(call);
        if self.fault_on_submission == Some(index) {
            return Err(PsiApiError::Fault(RemoteFault {
                message: "ProjectServerError(s) LastError=ProjectCheckedOut".into(),
                errors: vec![],
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectServer for FakeServer {
    async fn list_projects(
        &self,
        category: ProjectCategory,
    ) -> Result<Vec<ProjectRecord>, PsiApiError> {
        Ok(self.tables.get(&category).cloned().unwrap_or_default())
    }

    async fn list_archived_projects(&self) -> Result<Vec<ArchivedProjectRecord>, PsiApiError> {
        Ok(self.archive.clone())
    }

    async fn submit_standard_delete(
        &self,
        job: Uuid,
        delete_workspace: bool,
        project_ids: &[Uuid],
    ) -> Result<(), PsiApiError> {
        self.record_submission(Call::StandardDelete {
            job,
            delete_workspace,
            project_ids: project_ids.to_vec(),
        })
    }

    async fn submit_archive_delete(
        &self,
        job: Uuid,
        version_id: Uuid,
        project_id: Uuid,
    ) -> Result<(), PsiApiError> {
        self.record_submission(Call::ArchiveDelete {
            job,
            version_id,
            project_id,
        })
    }

    async fn job_wait_seconds(&self, job: Uuid) -> Result<i64, PsiApiError> {
        self.calls.lock().unwrap().push(Call::WaitTime(job));
        Ok(4)
    }

    async fn job_state(&self, job: Uuid) -> Result<(JobState, Option<String>), PsiApiError> {
        self.calls.lock().unwrap().push(Call::State(job));
        let state = self
            .states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobState::Success);
        Ok((state, None))
    }
}

/// Sleeper that returns immediately and remembers what it was asked.
#[derive(Default)]
pub struct NoSleep {
    pub requested: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, duration: Duration) {
        self.requested.lock().unwrap().push(duration);
    }
}

/// Shared in-memory stdout.
#[derive(Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<u8>>>);

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transcript {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// A console that answers prompts with `input` and records its output.
pub fn scripted_console(input: &str) -> (Console, Transcript) {
    let transcript = Transcript::default();
    let console = Console::new(
        Box::new(transcript.clone()),
        Box::new(io::Cursor::new(input.as_bytes().to_vec())),
    );
    (console, transcript)
}

/// Write `lines` to a temporary input file.
pub fn input_file(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

pub fn snapshot(name: &str, project_id: Uuid, version_id: Uuid, day: u32) -> ArchivedProjectRecord {
    ArchivedProjectRecord {
        name: name.to_string(),
        project_id,
        version_id,
        version_date: NaiveDate::from_ymd_opt(2023, 11, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}
