//! # DPoP Proofs
//!
//! Construction of DPoP proof JWTs ([RFC 9449](https://www.rfc-editor.org/rfc/rfc9449)):
//! a short-lived JWT binding an HTTP request to the key the Wallet holds.
//! When an access token accompanies the request, the proof carries its
//! base64url-encoded SHA-256 hash in the `ath` claim.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::handlers::Result;
use crate::jose::PublicKeyJwk;
use crate::provider::JwsSigner;
use crate::{JwtType, generate};

/// Parameters of the HTTP request a DPoP proof is bound to.
#[derive(Clone, Debug, Default)]
pub struct DpopRequest {
    /// The HTTP method of the request, e.g. "POST".
    pub htm: String,

    /// The HTTP URI of the request, without query and fragment.
    pub htu: String,

    /// The public part of the key the proof demonstrates possession of.
    pub public_jwk: PublicKeyJwk,

    /// A server-provided nonce, when the server issued one.
    pub nonce: Option<String>,

    /// The access token the request carries, when bound to one.
    pub access_token: Option<String>,
}

/// Create a DPoP proof JWT for the described HTTP request.
///
/// # Errors
///
/// Returns an error if the injected signer fails.
pub async fn create_dpop_proof(signer: &impl JwsSigner, request: &DpopRequest) -> Result<String> {
    let header = json!({
        "typ": JwtType::DpopJwt,
        "jwk": request.public_jwk,
    });

    let mut claims = json!({
        "jti": generate::uri_token(),
        "htm": request.htm,
        "htu": request.htu,
        "iat": Utc::now().timestamp(),
    });
    if let Some(nonce) = &request.nonce {
        claims["nonce"] = json!(nonce);
    }
    if let Some(token) = &request.access_token {
        claims["ath"] = json!(access_token_hash(token));
    }

    let signed = signer
        .sign_jwt(header, claims)
        .await
        .map_err(|e| Error::Unexpected(format!("issue signing dpop proof: {e}")))?;

    Ok(signed.jwt)
}

/// The `ath` claim value: base64url-encoded SHA-256 of the access token.
#[must_use]
pub fn access_token_hash(access_token: &str) -> String {
    let digest = Sha256::digest(access_token.as_bytes());
    Base64UrlUnpadded::encode_string(&digest)
}
