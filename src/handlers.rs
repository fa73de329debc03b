//! # Handlers
//!
//! The operations this crate exposes to callers: parsing an Authorization
//! Request JWT, fetching an Authorization Request URL, and building the
//! Authorization Response. Each call is independent and stateless; failures
//! propagate immediately with no retries.

mod create_response;
mod fetch_request;
mod parse_request;

pub use self::create_response::create_authorization_response;
pub use self::fetch_request::{
    FetchedAuthorizationRequest, SendBy, fetch_authorization_request,
    validate_authorization_request_params,
};
pub use self::parse_request::parse_authorize_request;
use crate::error::Error;

/// Result type for wallet-side `OpenID4VP` operations.
pub type Result<T, E = Error> = anyhow::Result<T, E>;
