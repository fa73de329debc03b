//! # Errors
//!
//! Failure kinds surfaced by the wallet-side `OpenID4VP` engine. Each variant
//! maps to a distinct stage of request parsing, fetching, or response
//! construction so callers can decide between retry and abort.

use thiserror::Error;

/// Errors returned by the wallet-side `OpenID4VP` engine.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The compact JWT encoding is malformed: wrong segment count or invalid
    /// base64url.
    #[error("malformed compact JWT: {0}")]
    StructuralParse(String),

    /// Decoded JSON does not match the expected shape: missing required
    /// field, wrong literal value, or wrong type.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The request lacked the trust material its `client_id` prefix calls
    /// for, or the supplied material could not yield a verification key.
    #[error("trust resolution failed: {0}")]
    TrustResolution(String),

    /// The request reached cryptographic checking and failed it.
    #[error("signature verification failed: {0}")]
    SignatureVerification(String),

    /// A non-success HTTP status or network failure while retrieving the
    /// Request Object.
    #[error("transport error (status {status}): {message}")]
    Transport {
        /// The HTTP status code, or 0 when the request never completed.
        status: u16,
        /// Description of the failure.
        message: String,
    },

    /// The `request_uri_method` parameter is not `get` or `post`, or appears
    /// without a `request_uri`.
    #[error("invalid request_uri_method: {0}")]
    InvalidRequestUriMethod(String),

    /// Any failure while building the Authorization Response: missing keys,
    /// metadata/prefix mismatch, or encryption failure.
    #[error("failed to create authorization response: {0}")]
    ResponseConstruction(String),

    /// Catch-all for failures not matching any other kind. Always carries the
    /// originating error's message.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<Self>() {
            Some(e) => e.clone(),
            None => {
                let stack = err.chain().fold(String::new(), |cause, e| format!("{cause} -> {e}"));
                let stack = stack.trim_start_matches(" -> ").to_string();
                Self::Unexpected(stack)
            }
        }
    }
}
