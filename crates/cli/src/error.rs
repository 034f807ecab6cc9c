use purge_core::error::CoreError;
use purge_psi::api::PsiApiError;

/// Guidance printed after a transport failure.
const CONNECTIVITY_HINT: &str = "Error connecting to Project Server. Please check the URL, your permissions\n\
to connect to the server, and the Project Server Queuing Service.";

/// Invalid environment configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("PWA_USERNAME and PWA_PASSWORD must be set together")]
    PartialCredentials,
}

/// Anything that ends a run early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] CoreError),

    #[error(transparent)]
    Remote(#[from] PsiApiError),

    #[error("Console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

impl RunError {
    /// Full console text for this error, including the connectivity hint
    /// for transport failures.
    pub fn render(&self) -> String {
        match self {
            RunError::Remote(err) if err.is_connectivity() => {
                format!("Error: {err}\n\n{CONNECTIVITY_HINT}")
            }
            RunError::Remote(PsiApiError::Fault(fault)) => fault.to_string(),
            other => format!("Error: {other}"),
        }
    }
}
