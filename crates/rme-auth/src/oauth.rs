use std::time::Duration;

use crate::callback::{AuthorizationCode, CallbackListener};
use crate::error::AuthError;

const AUTHORIZE_ENDPOINT: &str = "https://www.reddit.com/api/v1/authorize";

/// Parameters of the authorization-code request sent to the browser.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest<'a> {
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub scopes: &'a [&'a str],
    pub state: &'a str,
    /// `permanent` or `temporary`.
    pub duration: &'a str,
}

impl AuthorizeRequest<'_> {
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{AUTHORIZE_ENDPOINT}?client_id={client_id}&response_type=code&state={state}&redirect_uri={redirect}&duration={duration}&scope={scope}",
            client_id = urlencoding::encode(self.client_id),
            state = urlencoding::encode(self.state),
            redirect = urlencoding::encode(self.redirect_uri),
            duration = urlencoding::encode(self.duration),
            scope = urlencoding::encode(&self.scopes.join(" ")),
        )
    }
}

/// Generate a random 16-byte hex state nonce for CSRF protection.
///
/// # Errors
///
/// Returns `AuthError::Nonce` if the OS random source fails.
pub fn generate_state() -> Result<String, AuthError> {
    let mut nonce_bytes = [0u8; 16];
    getrandom::fill(&mut nonce_bytes).map_err(|e| AuthError::Nonce(e.to_string()))?;
    Ok(nonce_bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Open the browser on `authorize_url` and wait for the redirect on `listener`.
///
/// The blocking accept runs in `spawn_blocking`. If the browser cannot be
/// opened, the URL stays printed so the user can open it manually.
///
/// # Errors
///
/// Propagates the listener's outcome (`StateMismatch`, `Denied`, timeouts).
pub async fn capture_code(
    listener: CallbackListener,
    authorize_url: &str,
    state: String,
    timeout: Option<Duration>,
) -> Result<AuthorizationCode, AuthError> {
    eprintln!("Opening browser to: {authorize_url}");
    if let Err(error) = open::that(authorize_url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    tokio::task::spawn_blocking(move || listener.await_authorization(&state, timeout))
        .await
        .map_err(|e| AuthError::Listener(format!("spawn_blocking join: {e}")))?
}
