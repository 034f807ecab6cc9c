//! One complete deletion run.
//!
//! [`run`] reads the server's project tables, resolves the input file,
//! prints the summary, asks for confirmation and dispatches the deletes.
//! All state lives in the [`RunContext`] passed in and the [`RunReport`]
//! handed back.

use std::path::PathBuf;

use purge_core::input::read_candidate_names;
use purge_core::resolver::{resolve_archived, resolve_standard, Resolution, StandardTables};
use purge_core::types::{
    ArchivedProjectRecord, MatchReport, ProjectCategory, ResolvedDeletionTarget,
};
use purge_psi::poller::{PollerConfig, Sleeper};
use purge_psi::server::ProjectServer;

use crate::console::Console;
use crate::dispatcher::{DispatchOptions, DispatchSummary, Dispatcher};
use crate::error::RunError;

/// Which inventory the names are resolved against and deleted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Draft and published projects.
    Standard,
    /// Archived snapshots.
    Archive { keep_latest: bool },
}

/// Options from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// PWA base URL, always ending with `/`.
    pub base_url: String,
    pub input_file: PathBuf,
    pub store: StoreMode,
    pub delete_workspace_sites: bool,
    pub wait: bool,
    pub verify: bool,
}

/// Everything a run needs, passed explicitly.
pub struct RunContext<'a, S: ?Sized> {
    pub options: &'a RunOptions,
    pub server: &'a S,
    pub sleeper: &'a dyn Sleeper,
    pub poller: PollerConfig,
    pub console: &'a mut Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `-verify` was given.
    Verified,
    /// No input name resolved to a deletable project.
    NothingToDelete,
    /// The confirmation prompt was declined.
    Aborted,
    /// Delete jobs were submitted.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub matches: MatchReport,
    pub targets: Vec<ResolvedDeletionTarget>,
    pub dispatch: DispatchSummary,
    pub outcome: RunOutcome,
}

pub async fn run<S>(ctx: RunContext<'_, S>) -> Result<RunReport, RunError>
where
    S: ProjectServer + ?Sized,
{
    let RunContext {
        options,
        server,
        sleeper,
        poller,
        console,
    } = ctx;

    console.line("Connecting to Project Server to retrieve project list...");
    let tables = fetch_tables(server, options.store).await?;

    console.line("Reading input file...");
    let candidates = read_candidate_names(&options.input_file)?;

    let Resolution {
        targets,
        outcomes,
        report: matches,
    } = tables.resolve(&candidates);

    for outcome in &outcomes {
        if outcome.found {
            console.line(format_args!("Found: {}", outcome.candidate));
        } else {
            console.line(format_args!("FAILED to find: {}", outcome.candidate));
        }
    }

    print_summary(console, options.store, &matches, targets.len());
    tracing::info!(
        input_lines = matches.input_lines,
        not_found = matches.not_found,
        kept_latest = matches.kept_latest,
        targets = targets.len(),
        "Resolved input file"
    );

    let outcome = if options.verify {
        console.line("No deletes. Verifying only.");
        RunOutcome::Verified
    } else if targets.is_empty() {
        console.line("No deletes. No projects to delete were found.");
        RunOutcome::NothingToDelete
    } else if !confirm(console)? {
        console.line("Deletion aborted.");
        RunOutcome::Aborted
    } else {
        RunOutcome::Completed
    };

    let mut dispatch = DispatchSummary::default();
    if outcome == RunOutcome::Completed {
        console.line("Beginning to delete projects...");
        let dispatch_options = DispatchOptions {
            delete_workspace_sites: options.delete_workspace_sites,
            wait: options.wait,
        };
        dispatch = Dispatcher::new(server, sleeper, poller, dispatch_options)
            .dispatch(&targets, console)
            .await?;

        if dispatch.failed > 0 {
            console.line(format_args!(
                "{} of {} queued jobs failed.",
                dispatch.failed, dispatch.submitted
            ));
        }
    }

    console.line("Execution Complete.");

    Ok(RunReport {
        matches,
        targets,
        dispatch,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The lookup tables for one store.
enum Tables {
    Standard(StandardTables),
    Archive {
        rows: Vec<ArchivedProjectRecord>,
        keep_latest: bool,
    },
}

impl Tables {
    fn resolve(&self, candidates: &[String]) -> Resolution {
        match self {
            Tables::Standard(tables) => resolve_standard(candidates, tables),
            Tables::Archive { rows, keep_latest } => resolve_archived(candidates, rows, *keep_latest),
        }
    }
}

async fn fetch_tables<S>(server: &S, store: StoreMode) -> Result<Tables, RunError>
where
    S: ProjectServer + ?Sized,
{
    match store {
        StoreMode::Standard => {
            let mut tables = StandardTables::new();
            for category in ProjectCategory::SEARCH_ORDER {
                let rows = server.list_projects(category).await?;
                tables.insert(category, rows);
            }
            Ok(Tables::Standard(tables))
        }
        StoreMode::Archive { keep_latest } => {
            let rows = server.list_archived_projects().await?;
            Ok(Tables::Archive { rows, keep_latest })
        }
    }
}

fn print_summary(console: &mut Console, store: StoreMode, matches: &MatchReport, targets: usize) {
    console.line(format_args!(
        "{} projects listed in the input file were not found.",
        matches.not_found
    ));

    match store {
        StoreMode::Standard => {
            console.line(format_args!(
                "{targets} projects will be deleted from draft and published dbs"
            ));
            console.line(format_args!(
                "   (out of {} projects on the server.)",
                matches.table_size
            ));
        }
        StoreMode::Archive { keep_latest } => {
            if keep_latest {
                console.line(format_args!(
                    "{} archived versions were kept as the latest version.",
                    matches.kept_latest
                ));
            }
            console.line(format_args!("{targets} projects will be deleted from archive db"));
            console.line(format_args!(
                "   (out of {} projects in the Archive db.)",
                matches.table_size
            ));
            console.line(" Note that a project may be counted multiple times: multiple versions may");
            console.line(" be present in the archive db.");
        }
    }
}

/// Ask the operator to confirm. Only `y` (any case) proceeds.
fn confirm(console: &mut Console) -> Result<bool, RunError> {
    console.line("WARNING! About to delete projects. This action is not reversible!");
    let answer = console.prompt("Enter Y if you want to continue: ")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
