//! Remote service (Reddit) client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Raw environment variables holding the client credentials.
pub const CREDENTIAL_VARS: [&str; 2] = ["CLIENT_ID", "CLIENT_SECRET"];

fn default_redirect_uri() -> String {
    "http://localhost:8000".to_string()
}

fn default_user_agent() -> String {
    "RedditMirrorEdit Job {job_id}".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedditConfig {
    /// OAuth client identifier of the registered app.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret of the registered app.
    #[serde(default)]
    pub client_secret: String,

    /// User agent template; `{job_id}` is replaced by the job identifier.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Redirect URI registered for the app. The callback listener binds its
    /// host and port.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Seconds to wait for the authorization callback. 0 waits indefinitely.
    #[serde(default)]
    pub callback_timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: default_user_agent(),
            redirect_uri: default_redirect_uri(),
            callback_timeout_secs: 0,
        }
    }
}

impl RedditConfig {
    /// Check if both client credentials are present and non-blank.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// Fail unless the client credentials are configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` naming the expected variables.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials {
                expected: CREDENTIAL_VARS.join(", "),
            })
        }
    }

    /// User agent for a given job.
    #[must_use]
    pub fn user_agent_for(&self, job_id: &str) -> String {
        self.user_agent.replace("{job_id}", job_id)
    }

    /// `host:port` the callback listener must bind to receive the redirect.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless `redirect_uri` is a plain
    /// `http` URL with a host.
    pub fn callback_address(&self) -> Result<String, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: "reddit.redirect_uri".into(),
            reason,
        };

        let uri = Url::parse(&self.redirect_uri).map_err(|e| invalid(e.to_string()))?;
        if uri.scheme() != "http" {
            return Err(invalid(format!(
                "scheme must be http for the local listener, got {}",
                uri.scheme()
            )));
        }
        let host = uri
            .host_str()
            .ok_or_else(|| invalid("missing host".into()))?;
        let port = uri
            .port_or_known_default()
            .ok_or_else(|| invalid("missing port".into()))?;
        Ok(format!("{host}:{port}"))
    }

    /// Callback wait limit; `None` means wait indefinitely.
    #[must_use]
    pub const fn callback_timeout(&self) -> Option<std::time::Duration> {
        if self.callback_timeout_secs == 0 {
            None
        } else {
            Some(std::time::Duration::from_secs(self.callback_timeout_secs))
        }
    }
}
