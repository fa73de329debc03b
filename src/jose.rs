//! # JOSE Data Contracts
//!
//! Compact JWT structural decoding plus the JWK data contracts used
//! throughout the crate. Decoding is purely structural: segments are split,
//! base64url-decoded, and deserialized into typed header and claims. No
//! signature is checked here — that is the business of the injected
//! [`crate::provider::JwtVerifier`] capability.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::handlers::Result;

/// A decoded JWT: typed header and claims.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Jwt<H, C> {
    /// The JWT protected header.
    pub header: H,

    /// The JWT claims.
    pub claims: C,
}

/// Decode a compact JWT into a typed header and claims pair.
///
/// Segment and base64url failures surface as [`Error::StructuralParse`];
/// shape failures of the decoded JSON surface as [`Error::Validation`].
///
/// # Errors
///
/// Returns an error if the token does not have three dot-separated segments,
/// a segment is not valid base64url, or the decoded JSON does not match the
/// target types.
pub fn decode<H, C>(compact: &str) -> Result<Jwt<H, C>>
where
    H: DeserializeOwned,
    C: DeserializeOwned,
{
    let segments = compact.split('.').collect::<Vec<&str>>();
    if segments.len() != 3 {
        return Err(Error::StructuralParse(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let header_bytes = Base64UrlUnpadded::decode_vec(segments[0])
        .map_err(|e| Error::StructuralParse(format!("invalid header encoding: {e}")))?;
    let claims_bytes = Base64UrlUnpadded::decode_vec(segments[1])
        .map_err(|e| Error::StructuralParse(format!("invalid claims encoding: {e}")))?;

    let header = serde_json::from_slice::<H>(&header_bytes)
        .map_err(|e| Error::Validation(format!("invalid header: {e}")))?;
    let claims = serde_json::from_slice::<C>(&claims_bytes)
        .map_err(|e| Error::Validation(format!("invalid claims: {e}")))?;

    Ok(Jwt { header, claims })
}

/// A public key in JWK form, as carried in Verifier metadata or a `cnf`
/// claim. The key material itself is opaque to this crate.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PublicKeyJwk {
    /// Key type, e.g. "EC" or "OKP".
    pub kty: String,

    /// Cryptographic curve, e.g. "P-256" or "Ed25519".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// Base64url-encoded x-coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Base64url-encoded y-coordinate (EC keys only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Key identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Intended use of the key: "sig" or "enc".
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,

    /// Algorithm intended for use with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

/// JSON Web Key Set containing public keys of the Verifier.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Jwks {
    /// Keys in the set.
    pub keys: Vec<PublicKeyJwk>,
}
