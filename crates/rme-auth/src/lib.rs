//! # rme-auth
//!
//! Authorization-code capture for the OAuth login of the `rme` binary.
//!
//! Provides a one-shot loopback callback listener (`tiny_http`), CSRF state
//! nonce generation (`getrandom`), authorize URL construction, and browser
//! launch (`open`). Token exchange is left to the remote service client.

pub mod callback;
pub mod error;
pub mod oauth;

pub use callback::{AuthorizationCode, CallbackListener, CallbackParams};
pub use error::AuthError;
pub use oauth::{AuthorizeRequest, capture_code, generate_state};
