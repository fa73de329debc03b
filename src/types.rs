//! # `OpenID4VP` Types
//!
//! Request, response, and metadata types for the wallet-side presentation
//! exchange.

mod metadata;
mod request;
mod response;

pub use self::metadata::*;
pub use self::request::*;
pub use self::response::*;
