//! `deleteprojects` -- bulk project deletion for Project Server.
//!
//! Reads a list of project names, resolves them against the server's
//! draft/published or archive inventory and queues a delete job for each
//! match after confirmation.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default | Description                          |
//! |------------------------------|----------|---------|--------------------------------------|
//! | `PWA_USERNAME`               | no       | --      | Basic-auth user (with `PWA_PASSWORD`) |
//! | `PWA_PASSWORD`               | no       | --      | Basic-auth password                  |
//! | `PURGE_REQUEST_TIMEOUT_SECS` | no       | `120`   | Timeout for each PSI request         |
//! | `PURGE_POLL_MAX_WAIT_SECS`   | no       | `10`    | Cap on each wait between job checks  |
//! | `PURGE_POLL_REMINDER_EVERY`  | no       | `10`    | Polls between interrupt reminders    |
//! | `RUST_LOG`                   | no       | `purge_cli=warn,purge_psi=warn` | Log filter |

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use purge_cli::cli::{self, UsageError, USAGE};
use purge_cli::config::PurgeConfig;
use purge_cli::console::Console;
use purge_cli::error::RunError;
use purge_cli::run::{run, RunContext, RunOptions, RunReport};
use purge_psi::api::PsiApi;
use purge_psi::poller::TokioSleeper;

/// Exit code for invalid command-line arguments.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "purge_cli=warn,purge_psi=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = match cli::parse_args(std::env::args()) {
        Ok(options) => options,
        Err(UsageError::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected command line");
            print!("{USAGE}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match execute(&options).await {
        Ok(report) => {
            tracing::info!(
                outcome = ?report.outcome,
                submitted = report.dispatch.submitted,
                failed = report.dispatch.failed,
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("{}", e.render());
            ExitCode::FAILURE
        }
    }
}

async fn execute(options: &RunOptions) -> Result<RunReport, RunError> {
    let config = PurgeConfig::from_env()?;
    let api = PsiApi::new(config.psi_config(&options.base_url))?;

    tracing::info!(
        base_url = %api.base_url(),
        store = ?options.store,
        verify = options.verify,
        wait = options.wait,
        "Starting deleteprojects"
    );

    let mut console = Console::stdio();
    run(RunContext {
        options,
        server: &api,
        sleeper: &TokioSleeper,
        poller: config.poller,
        console: &mut console,
    })
    .await
}
