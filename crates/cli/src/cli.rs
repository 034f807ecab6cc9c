//! Command-line parsing.
//!
//! Flags are accepted in single-dash, slash or double-dash form and in any
//! case (`-url`, `/inputfile`, `-Wait`). Arguments are
//! first normalised onto clap long flags, then parsed by [`Cli`].

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::run::{RunOptions, StoreMode};

pub const USAGE: &str = "\
Deletes Projects from a Project Server.

Usage: deleteprojects -url http[s]://PWAServer/pwa/ -inputfile path/filename
       [-deletewsssites] [-deletearchived] [-keeplatest] [-wait] [-verify]

Options:
   -url pwaurl      Specify the url for the PWA instance on which to delete
                       projects. Required.
   -inputfile path  Specify a text file listing projects to be deleted.
                       Each project should be on a separate line. Required.
   -deletewsssites  WSS sites related to the deleted projects will be
                       deleted as well. Ignored if -deletearchived is used.
   -deletearchived  The projects are deleted from the archive database. If
                       not present, projects are deleted from the draft and
                       published databases.
   -keeplatest      With -deletearchived, keep the most recent archived
                       version of each project.
   -wait            Execution will pause until Project Server processes
                       each job.
   -verify          Command will not actually delete projects or WSS sites.

Example:
   deleteprojects -url https://server/pwa/ -inputfile oldprojects.txt
         -deletewsssites
";

/// Flags that consume the following argument verbatim.
const VALUE_FLAGS: [&str; 2] = ["url", "inputfile"];

#[derive(Parser, Debug)]
#[command(
    name = "deleteprojects",
    about = "Deletes Projects from a Project Server",
    args_override_self = true
)]
pub struct Cli {
    /// PWA instance URL
    #[arg(long)]
    pub url: String,

    /// Text file listing one project name per line
    #[arg(long = "inputfile")]
    pub input_file: PathBuf,

    /// Also delete the projects' workspace sites
    #[arg(long = "deletewsssites")]
    pub delete_wss_sites: bool,

    /// Delete from the archive database instead of draft/published
    #[arg(long = "deletearchived")]
    pub delete_archived: bool,

    /// Keep the newest archived version of each project
    #[arg(long = "keeplatest")]
    pub keep_latest: bool,

    /// Wait for each queued job to finish
    #[arg(long)]
    pub wait: bool,

    /// Resolve and report only; delete nothing
    #[arg(long)]
    pub verify: bool,
}

/// Why the arguments did not produce a runnable configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("help requested")]
    Help,

    #[error("invalid arguments: {0}")]
    Invalid(String),
}

/// Parse a full argument vector (program name first).
pub fn parse_args<I>(args: I) -> Result<RunOptions, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let normalized = normalize_args(args)?;
    let cli = Cli::try_parse_from(normalized).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => UsageError::Help,
        kind => UsageError::Invalid(kind.as_str().unwrap_or("unrecognised arguments").to_string()),
    })?;
    cli.into_options()
}

/// Map `-flag`, `/flag` and `--Flag` onto lower-case `--flag`. Values of
/// [`VALUE_FLAGS`] are attached as `--flag=value` and otherwise untouched,
/// so a value may itself start with `-` or `/`.
fn normalize_args<I>(args: I) -> Result<Vec<String>, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let mut out: Vec<String> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let lowered = arg.to_lowercase();
        if lowered == "help" || lowered == "?" {
            return Err(UsageError::Help);
        }

        let name = lowered
            .strip_prefix("--")
            .or_else(|| lowered.strip_prefix('-'))
            .or_else(|| lowered.strip_prefix('/'));

        match name {
            Some(name) if VALUE_FLAGS.contains(&name) => match iter.next() {
                Some(value) => out.push(format!("--{name}={value}")),
                None => out.push(format!("--{name}")),
            },
            Some(name) => out.push(format!("--{name}")),
            None => out.push(arg),
        }
    }

    Ok(out)
}

impl Cli {
    fn into_options(self) -> Result<RunOptions, UsageError> {
        let starts_with_http = self
            .url
            .get(..4)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"));
        if !starts_with_http {
            return Err(UsageError::Invalid(format!("url must start with http: {}", self.url)));
        }

        let mut base_url = self.url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let store = if self.delete_archived {
            StoreMode::Archive {
                keep_latest: self.keep_latest,
            }
        } else {
            StoreMode::Standard
        };

        Ok(RunOptions {
            base_url,
            input_file: self.input_file,
            store,
            delete_workspace_sites: self.delete_wss_sites,
            wait: self.wait,
            verify: self.verify,
        })
    }
}
