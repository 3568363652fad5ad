use std::fmt;
use std::time::Duration;

use crate::error::AuthError;

const SUCCESS_BODY: &str = "Success, you may close this window.";

/// Authorization code returned by the redirect.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode(***)")
    }
}

/// Query parameters recognized on the redirect request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse the parameters out of a request target such as `/?state=1&code=x`.
    ///
    /// Unknown keys are ignored. Values are percent-decoded; a value that does
    /// not decode to UTF-8 is kept verbatim.
    #[must_use]
    pub fn from_request_target(target: &str) -> Self {
        let mut params = Self::default();
        let Some((_, query)) = target.split_once('?') else {
            return params;
        };

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(value)
                .map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned);
            match key {
                "state" => params.state = Some(value),
                "code" => params.code = Some(value),
                "error" => params.error = Some(value),
                _ => {}
            }
        }

        params
    }

    /// Decide the outcome of the callback and the plaintext body to answer with.
    ///
    /// The state is checked before anything else; an `error` parameter wins
    /// over a `code`.
    fn evaluate(self, expected_state: &str) -> (String, Result<AuthorizationCode, AuthError>) {
        let received = self.state.unwrap_or_else(|| "<none>".to_string());
        if received != expected_state {
            let body = format!("State Mismatch\nExpected {expected_state} Received: {received}");
            return (
                body,
                Err(AuthError::StateMismatch {
                    expected: expected_state.to_string(),
                    received,
                }),
            );
        }

        if let Some(error) = self.error {
            return (error.clone(), Err(AuthError::Denied(error)));
        }

        match self.code {
            Some(code) => (SUCCESS_BODY.to_string(), Ok(AuthorizationCode(code))),
            None => (
                "No authorization code received.".to_string(),
                Err(AuthError::MissingCode),
            ),
        }
    }
}

/// One-shot loopback listener for the OAuth redirect.
///
/// Accepts exactly one request, answers it, and stops serving. It never
/// rebinds; a port that is already taken is reported as [`AuthError::Bind`].
pub struct CallbackListener {
    server: tiny_http::Server,
}

impl CallbackListener {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Bind` if the address cannot be bound.
    pub fn bind(addr: &str) -> Result<Self, AuthError> {
        let server = tiny_http::Server::http(addr).map_err(|e| AuthError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { server })
    }

    /// Port the listener is bound to.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|a| a.port())
    }

    /// Block until the redirect arrives and extract the authorization code.
    ///
    /// `timeout` of `None` waits indefinitely. The listener is consumed: it
    /// answers one request and is dropped, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `AuthError::StateMismatch` if the returned state differs from `expected_state`
    /// - `AuthError::Denied` if the provider redirected with an `error`
    /// - `AuthError::MissingCode` if neither an error nor a code was present
    /// - `AuthError::CallbackTimeout` / `AuthError::Listener` on listener failures
    pub fn await_authorization(
        self,
        expected_state: &str,
        timeout: Option<Duration>,
    ) -> Result<AuthorizationCode, AuthError> {
        let request = match timeout {
            Some(limit) => self
                .server
                .recv_timeout(limit)
                .map_err(|e| AuthError::Listener(format!("recv error: {e}")))?
                .ok_or(AuthError::CallbackTimeout(limit.as_secs()))?,
            None => self
                .server
                .recv()
                .map_err(|e| AuthError::Listener(format!("recv error: {e}")))?,
        };

        let params = CallbackParams::from_request_target(request.url());
        let (body, outcome) = params.evaluate(expected_state);

        if let Err(error) = request.respond(tiny_http::Response::from_string(body)) {
            tracing::debug!(%error, "failed to answer authorization callback");
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_state_and_code() {
        let params = CallbackParams::from_request_target("/?state=4711&code=abc-DEF");
        assert_eq!(
            params,
            CallbackParams {
                state: Some("4711".into()),
                code: Some("abc-DEF".into()),
                error: None,
            }
        );
    }

    #[test]
    fn decodes_percent_encoded_values() {
        let params = CallbackParams::from_request_target("/cb?state=a%20b&error=access_denied");
        assert_eq!(params.state.as_deref(), Some("a b"));
        assert_eq!(params.error.as_deref(), Some("access_denied"));
    }

    #[test]
    fn target_without_query_has_no_params() {
        assert_eq!(
            CallbackParams::from_request_target("/favicon.ico"),
            CallbackParams::default()
        );
    }

    #[test]
    fn state_mismatch_is_checked_before_error() {
        let params = CallbackParams {
            state: Some("other".into()),
            code: None,
            error: Some("access_denied".into()),
        };
        let (body, outcome) = params.evaluate("expected");
        assert_eq!(body, "State Mismatch\nExpected expected Received: other");
        assert!(matches!(
            outcome,
            Err(AuthError::StateMismatch { ref received, .. }) if received == "other"
        ));
    }

    #[test]
    fn missing_state_is_a_mismatch() {
        let (_, outcome) = CallbackParams::default().evaluate("expected");
        assert!(matches!(outcome, Err(AuthError::StateMismatch { .. })));
    }

    #[test]
    fn error_parameter_is_a_denial() {
        let params = CallbackParams {
            state: Some("s".into()),
            code: Some("ignored".into()),
            error: Some("access_denied".into()),
        };
        let (body, outcome) = params.evaluate("s");
        assert_eq!(body, "access_denied");
        assert!(matches!(outcome, Err(AuthError::Denied(ref e)) if e == "access_denied"));
    }

    #[test]
    fn matching_state_with_code_succeeds() {
        let params = CallbackParams {
            state: Some("s".into()),
            code: Some("the-code".into()),
            error: None,
        };
        let (body, outcome) = params.evaluate("s");
        assert_eq!(body, SUCCESS_BODY);
        assert_eq!(outcome.expect("should succeed").as_str(), "the-code");
    }

    #[test]
    fn code_debug_output_is_redacted() {
        let code = AuthorizationCode("secret".into());
        assert_eq!(format!("{code:?}"), "AuthorizationCode(***)");
    }
}
