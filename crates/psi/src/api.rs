//! HTTP client for the PSI web services.
//!
//! Wraps the Project, Archive and QueueSystem services of a Project Web
//! App instance using [`reqwest`]. Every operation is a JSON `POST` to
//! `{base}{service}/{Operation}`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::fault::RemoteFault;
use crate::wire::Envelope;

/// Default timeout for a single PSI request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The PSI services used by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsiService {
    Project,
    QueueSystem,
    Archive,
}

impl PsiService {
    /// Path relative to the PWA base URL.
    pub fn path(self) -> &'static str {
        match self {
            PsiService::Project => "_vti_bin/psi/project.asmx",
            PsiService::QueueSystem => "_vti_bin/psi/queuesystem.asmx",
            PsiService::Archive => "_vti_bin/psi/Archive.asmx",
        }
    }
}

/// Username and password sent as HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for one PWA instance.
#[derive(Debug, Clone)]
pub struct PsiConfig {
    /// PWA base URL. Always ends with `/`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub credentials: Option<Credentials>,
}

impl PsiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            credentials: None,
        }
    }
}

/// Errors from the PSI HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum PsiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a structured fault.
    #[error("{0}")]
    Fault(RemoteFault),

    /// A non-2xx response without a fault body.
    #[error("PSI error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response from {operation}: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PsiApiError {
    /// Transport-level failures, as opposed to answers from the server.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, PsiApiError::Request(_))
    }
}

/// HTTP client for a single PWA instance.
pub struct PsiApi {
    client: reqwest::Client,
    config: PsiConfig,
}

impl PsiApi {
    /// Build a client with its own connection pool.
    pub fn new(config: PsiConfig) -> Result<Self, PsiApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: PsiConfig) -> Self {
        Self { client, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Full URL of one operation.
    pub fn operation_url(&self, service: PsiService, operation: &str) -> String {
        format!("{}{}/{}", self.config.base_url, service.path(), operation)
    }

    /// Invoke a PSI operation and decode the `d` member of the response.
    pub async fn call<B, T>(
        &self,
        service: PsiService,
        operation: &str,
        body: &B,
    ) -> Result<T, PsiApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.operation_url(service, operation);
        tracing::debug!(%url, "Calling PSI operation");

        let mut request = self.client.post(&url).json(body);
        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = Self::ensure_success(request.send().await?).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(|envelope| envelope.d)
            .map_err(|source| PsiApiError::Decode {
                operation: operation.to_string(),
                source,
            })
    }

    // ---- private helpers ----

    /// Return the response unchanged on success. Failures become a
    /// [`PsiApiError::Fault`] when the body is a PSI fault, otherwise a
    /// [`PsiApiError::ApiError`] with the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PsiApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        match serde_json::from_str::<RemoteFault>(&body) {
            Ok(fault) => {
                tracing::warn!(status = status.as_u16(), message = %fault.message, "PSI fault");
                Err(PsiApiError::Fault(fault))
            }
            Err(_) => Err(PsiApiError::ApiError {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_adds_trailing_slash() {
        let config = PsiConfig::new("https://server/pwa");
        assert_eq!(config.base_url, "https://server/pwa/");

        let config = PsiConfig::new("https://server/pwa/");
        assert_eq!(config.base_url, "https://server/pwa/");
    }

    #[test]
    fn operation_url_joins_service_path() {
        let api = PsiApi::with_client(reqwest::Client::new(), PsiConfig::new("http://pwa/"));
        assert_eq!(
            api.operation_url(PsiService::QueueSystem, "GetJobWaitTime"),
            "http://pwa/_vti_bin/psi/queuesystem.asmx/GetJobWaitTime"
        );
        assert_eq!(
            api.operation_url(PsiService::Archive, "ReadArchivedProjectsList"),
            "http://pwa/_vti_bin/psi/Archive.asmx/ReadArchivedProjectsList"
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let text = format!("{creds:?}");
        assert!(text.contains("admin"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn api_error_display() {
        let err = PsiApiError::ApiError {
            status: 503,
            body: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "PSI error (503): Service Unavailable");
        assert!(!err.is_connectivity());
    }

    #[test]
    fn request_error_is_connectivity() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = PsiApiError::Request(req_err);
        assert!(err.is_connectivity());
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
