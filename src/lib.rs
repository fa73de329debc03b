//! Wallet-side protocol engine for [OpenID for Verifiable Presentations](https://openid.net/specs/openid-4-verifiable-presentations-1_0.html).
//!
//! The crate implements the Authorization Request and Authorization Response
//! halves of the presentation exchange as seen from the Wallet:
//!
//! * fetching an Authorization Request sent by value or by reference,
//! * decoding and verifying the Request Object JWT, resolving the Verifier's
//!   signing key from inline metadata, an X.509 chain, or an OpenID
//!   Federation trust chain,
//! * building the JARM-encrypted (and optionally signed) Authorization
//!   Response carrying the VP Token.
//!
//! Wallet Attestation verification and DPoP proof construction are included
//! as companion modules ([`attestation`] and [`dpop`]).
//!
//! Cryptographic operations (signing, verification, encryption) and HTTP
//! transport are not performed by this crate. They are injected through the
//! capability traits in [`provider`], keeping the protocol logic independent
//! of any particular JOSE or HTTP implementation.

pub mod attestation;
pub mod dpop;
pub mod jose;
pub mod provider;
pub mod trust;
pub mod types;

mod error;
mod generate;
mod handlers;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub use self::error::Error;
pub use self::generate::uri_token;
pub use self::handlers::*;
pub use self::types::*;

/// The JWS `typ` header parameter.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum JwtType {
    /// General purpose JWT type.
    #[default]
    #[serde(rename = "jwt")]
    Jwt,

    /// JWT `typ` for Authorization Request Object.
    #[serde(rename = "oauth-authz-req+jwt")]
    OauthAuthzReqJwt,

    /// JWT `typ` for Wallet Attestation.
    #[serde(rename = "oauth-client-attestation+jwt")]
    OauthClientAttestationJwt,

    /// JWT `typ` for DPoP proof of possession.
    #[serde(rename = "dpop+jwt")]
    DpopJwt,
}

impl From<JwtType> for String {
    fn from(t: JwtType) -> Self {
        match t {
            JwtType::Jwt => "jwt".to_string(),
            JwtType::OauthAuthzReqJwt => "oauth-authz-req+jwt".to_string(),
            JwtType::OauthClientAttestationJwt => "oauth-client-attestation+jwt".to_string(),
            JwtType::DpopJwt => "dpop+jwt".to_string(),
        }
    }
}

impl Display for JwtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: String = self.clone().into();
        write!(f, "{s}")
    }
}
