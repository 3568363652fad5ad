use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to bind callback listener on {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("State Mismatch, expected {expected} received {received}")]
    StateMismatch { expected: String, received: String },

    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("authorization callback carried no code")]
    MissingCode,

    #[error("authorization callback timed out after {0}s")]
    CallbackTimeout(u64),

    #[error("callback listener error: {0}")]
    Listener(String),

    #[error("failed to generate state nonce: {0}")]
    Nonce(String),
}
