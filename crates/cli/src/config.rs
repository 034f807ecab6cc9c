use std::time::Duration;

use purge_psi::api::{Credentials, PsiConfig, DEFAULT_REQUEST_TIMEOUT};
use purge_psi::poller::{PollerConfig, DEFAULT_MAX_WAIT, DEFAULT_REMINDER_EVERY};

use crate::error::ConfigError;

/// Runtime settings that do not come from the command line.
#[derive(Debug, Clone)]
pub struct PurgeConfig {
    pub request_timeout: Duration,
    pub credentials: Option<Credentials>,
    pub poller: PollerConfig,
}

impl PurgeConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `PWA_USERNAME`               | --      |
    /// | `PWA_PASSWORD`               | --      |
    /// | `PURGE_REQUEST_TIMEOUT_SECS` | `120`   |
    /// | `PURGE_POLL_MAX_WAIT_SECS`   | `10`    |
    /// | `PURGE_POLL_REMINDER_EVERY`  | `10`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = match (lookup("PWA_USERNAME"), lookup("PWA_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let request_timeout = seconds(&lookup, "PURGE_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let max_wait = seconds(&lookup, "PURGE_POLL_MAX_WAIT_SECS")?.unwrap_or(DEFAULT_MAX_WAIT);

        let reminder_every = match lookup("PURGE_POLL_REMINDER_EVERY") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PURGE_POLL_REMINDER_EVERY",
                expected: "a non-negative integer",
                value,
            })?,
            None => DEFAULT_REMINDER_EVERY,
        };

        Ok(Self {
            request_timeout,
            credentials,
            poller: PollerConfig {
                max_wait,
                reminder_every,
                ..Default::default()
            },
        })
    }

    /// Connection settings for the PWA at `base_url`.
    pub fn psi_config(&self, base_url: &str) -> PsiConfig {
        let mut config = PsiConfig::new(base_url);
        config.request_timeout = self.request_timeout;
        config.credentials = self.credentials.clone();
        config
    }
}

fn seconds<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    var,
                    expected: "a whole number of seconds",
                    value,
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = PurgeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.poller.max_wait, Duration::from_secs(10));
        assert_eq!(config.poller.reminder_every, 10);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = PurgeConfig::from_lookup(lookup(&[
            ("PURGE_REQUEST_TIMEOUT_SECS", "30"),
            ("PURGE_POLL_MAX_WAIT_SECS", " 5 "),
            ("PURGE_POLL_REMINDER_EVERY", "0"),
            ("PWA_USERNAME", "admin"),
            ("PWA_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.poller.max_wait, Duration::from_secs(5));
        assert_eq!(config.poller.reminder_every, 0);
        assert_eq!(config.credentials.unwrap().username, "admin");
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = PurgeConfig::from_lookup(lookup(&[("PURGE_POLL_MAX_WAIT_SECS", "ten")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PURGE_POLL_MAX_WAIT_SECS",
                expected: "a whole number of seconds",
                value: "ten".into(),
            }
        );
    }

    #[test]
    fn username_without_password_is_rejected() {
        let err = PurgeConfig::from_lookup(lookup(&[("PWA_USERNAME", "admin")])).unwrap_err();
        assert_eq!(err, ConfigError::PartialCredentials);
    }

    #[test]
    fn psi_config_carries_timeout_and_credentials() {
        let config = PurgeConfig::from_lookup(lookup(&[
            ("PURGE_REQUEST_TIMEOUT_SECS", "45"),
            ("PWA_USERNAME", "admin"),
            ("PWA_PASSWORD", "secret"),
        ]))
        .unwrap();

        let psi = config.psi_config("https://server/pwa");
        assert_eq!(psi.base_url, "https://server/pwa/");
        assert_eq!(psi.request_timeout, Duration::from_secs(45));
        assert!(psi.credentials.is_some());
    }
}
