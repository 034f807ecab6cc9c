//! User-facing console transcript.
//!
//! Everything the operator reads goes through [`Console`]; diagnostics go
//! to `tracing` on stderr. Tests build a console over in-memory buffers.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use uuid::Uuid;

use purge_core::types::JobState;
use purge_psi::poller::PollReporter;

pub struct Console {
    out: Box<dyn Write + Send>,
    input: Box<dyn BufRead + Send>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>, input: Box<dyn BufRead + Send>) -> Self {
        Self { out, input }
    }

    /// Console over the process's stdout and stdin.
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::BufReader::new(io::stdin())))
    }

    /// Print one line. A failed write is logged, not raised.
    pub fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Console write failed");
        }
    }

    /// Print `question` without a newline and read one line of input.
    ///
    /// End of input yields an empty answer.
    pub fn prompt(&mut self, question: &str) -> io::Result<String> {
        write!(self.out, "{question}")?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl PollReporter for Console {
    fn in_progress(&mut self, job: Uuid, state: JobState, _polls: u32) {
        self.line(format_args!("Job State: {state} for Job ID: {job}"));
    }

    fn reminder(&mut self, job: Uuid, polls: u32) {
        self.line(format_args!(
            "Still waiting for job {job} after {polls} checks. Press Ctrl+C to stop; \
             queued jobs keep running on the server."
        ));
    }

    fn failed(&mut self, job: Uuid, state: JobState, diagnostic: Option<&str>) {
        self.line(format_args!("Queue Job failed. State: {state} for Job ID: {job}"));
        if let Some(diagnostic) = diagnostic {
            self.line(format_args!("   {diagnostic}"));
        }
    }
}
