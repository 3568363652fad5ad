//! Obtaining an access token: password grant or browser authorization.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use rme_auth::{AuthorizeRequest, CallbackListener, capture_code, generate_state};
use rme_config::RedditConfig;
use rme_core::{Authenticator, CoreError, JobId};

use super::RedditClient;
use super::wire::TokenResponse;
use crate::cli::Cli;

const TOKEN_ENDPOINT: &str = "https://www.reddit.com/api/v1/access_token";
const SCOPES: [&str; 4] = ["read", "edit", "history", "identity"];

/// How the job authenticates against Reddit.
pub enum Login {
    /// Script-app password grant. The 2FA code, if any, is already appended.
    Password {
        app: RedditConfig,
        username: String,
        password: String,
    },
    /// Authorization-code grant through the browser and a loopback listener.
    OAuth { app: RedditConfig },
}

impl Login {
    /// Pick the login mode from the flags, prompting for credentials if needed.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be read.
    pub fn from_cli(cli: &Cli, app: &RedditConfig) -> anyhow::Result<Self> {
        if cli.oauth {
            return Ok(Self::OAuth { app: app.clone() });
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let username = prompt_line(&mut input, "Username (wo/ u/ prefix): ")?;
        let password =
            rpassword::prompt_password("Password: ").context("failed to read password")?;
        let code = prompt_line(&mut input, "Enter your 2FA Code (if none, leave blank): ")?;

        Ok(Self::Password {
            app: app.clone(),
            username,
            password: with_second_factor(password, &code),
        })
    }
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("failed to write prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read input")?;
    Ok(line.trim().to_string())
}

/// Reddit expects the 2FA code as `password:code`.
fn with_second_factor(password: String, code: &str) -> String {
    if code.is_empty() {
        password
    } else {
        format!("{password}:{code}")
    }
}

fn http_client(app: &RedditConfig, job_id: &JobId) -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .user_agent(app.user_agent_for(&job_id.to_string()))
        .build()
        .map_err(|e| CoreError::Transport(e.to_string()))
}

async fn request_token(
    http: &reqwest::Client,
    app: &RedditConfig,
    form: &[(&str, &str)],
) -> Result<String, CoreError> {
    let response = http
        .post(TOKEN_ENDPOINT)
        .basic_auth(&app.client_id, Some(&app.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| CoreError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CoreError::Authentication(format!(
            "token endpoint returned {status}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| CoreError::Transport(e.to_string()))?;
    match (token.access_token, token.error) {
        (Some(access_token), None) => Ok(access_token),
        (_, Some(error)) => Err(CoreError::Authentication(error.to_string())),
        (None, None) => Err(CoreError::Authentication(
            "token response carried no access token".to_string(),
        )),
    }
}

async fn authorize_in_browser(app: &RedditConfig) -> Result<String, CoreError> {
    let auth_error = |e: rme_auth::AuthError| CoreError::Authentication(e.to_string());

    let state = generate_state().map_err(auth_error)?;
    let address = app
        .callback_address()
        .map_err(|e| CoreError::Authentication(e.to_string()))?;
    let listener = CallbackListener::bind(&address).map_err(auth_error)?;
    let url = AuthorizeRequest {
        client_id: &app.client_id,
        redirect_uri: &app.redirect_uri,
        scopes: &SCOPES,
        state: &state,
        duration: "permanent",
    }
    .url();

    let code = capture_code(listener, &url, state, app.callback_timeout())
        .await
        .map_err(auth_error)?;
    Ok(code.into_inner())
}

impl Authenticator for Login {
    type Session = RedditClient;

    async fn authenticate(self, job_id: &JobId) -> Result<RedditClient, CoreError> {
        let (http, token) = match &self {
            Self::Password {
                app,
                username,
                password,
            } => {
                let http = http_client(app, job_id)?;
                let form = [
                    ("grant_type", "password"),
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                ];
                let token = request_token(&http, app, &form).await?;
                (http, token)
            }
            Self::OAuth { app } => {
                let http = http_client(app, job_id)?;
                let code = authorize_in_browser(app).await?;
                let form = [
                    ("grant_type", "authorization_code"),
                    ("code", code.as_str()),
                    ("redirect_uri", app.redirect_uri.as_str()),
                ];
                let token = request_token(&http, app, &form).await?;
                (http, token)
            }
        };
        tracing::debug!(job_id = %job_id, "obtained access token");
        Ok(RedditClient::new(http, token))
    }
}
