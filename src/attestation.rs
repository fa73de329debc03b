//! # Wallet Attestation
//!
//! Issuance and verification of Wallet Attestation JWTs
//! (`oauth-client-attestation+jwt`), across the two published profile
//! versions. v1.0 attestations are anchored in an OpenID Federation trust
//! chain and must state an authenticator assurance level; v1.3 attestations
//! are anchored in an X.509 chain and the assurance level is optional.
//!
//! Unlike Authorization Request parsing, attestation verification does check
//! `exp`: a stale attestation is useless to present.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Error;
use crate::handlers::Result;
use crate::jose::{self, Jwt, PublicKeyJwk};
use crate::provider::{JwsSigner, JwtSigner, JwtVerifier};
use crate::{JwtType, generate};

/// Published Wallet Attestation profile versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// The v1.0 profile: federation trust chain, `aal` required.
    V10,

    /// The v1.3 profile: X.509 chain, `aal` optional.
    #[default]
    V13,
}

/// The protected header of a Wallet Attestation JWT.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AttestationHeader {
    /// The signing algorithm.
    pub alg: String,

    /// Media type of the JWT. Must be `oauth-client-attestation+jwt`.
    pub typ: JwtType,

    /// Identifier of the attester's signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// OpenID Federation trust chain. Required in v1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_chain: Option<Vec<String>>,

    /// Base64-encoded certificates, leaf first. Required in v1.3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,
}

/// Proof-of-possession key confirmation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Cnf {
    /// The key the Wallet instance holds.
    pub jwk: PublicKeyJwk,
}

/// The claims of a Wallet Attestation JWT.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AttestationClaims {
    /// The attestation issuer.
    pub iss: String,

    /// The attested Wallet instance (its client identifier).
    pub sub: String,

    /// Expiry as seconds since the epoch.
    pub exp: i64,

    /// Confirmation of the Wallet instance key.
    pub cnf: Cnf,

    /// Authenticator assurance level. Required in v1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aal: Option<String>,

    /// Claims not defined above are preserved, not rejected.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Verify a Wallet Attestation JWT against the given profile version.
///
/// # Errors
///
/// Returns [`Error::StructuralParse`] for a malformed token,
/// [`Error::Validation`] for a mis-shaped or expired one — including one
/// missing the trust material its version calls for — and
/// [`Error::SignatureVerification`] when the signature does not check out.
pub async fn verify_wallet_attestation_jwt(
    verifier: &impl JwtVerifier, attestation_jwt: &str, version: ProtocolVersion,
) -> Result<Jwt<AttestationHeader, AttestationClaims>> {
    let jwt = jose::decode::<AttestationHeader, AttestationClaims>(attestation_jwt)?;

    if jwt.header.typ != JwtType::OauthClientAttestationJwt {
        return Err(Error::Validation(format!("unexpected typ header: {}", jwt.header.typ)));
    }
    if jwt.claims.exp < Utc::now().timestamp() {
        return Err(Error::Validation("attestation has expired".to_string()));
    }

    let signer = match version {
        ProtocolVersion::V10 => {
            let Some(trust_chain) = &jwt.header.trust_chain else {
                return Err(Error::Validation(
                    "trust_chain header is required in a v1.0 attestation".to_string(),
                ));
            };
            if jwt.claims.aal.is_none() {
                return Err(Error::Validation(
                    "aal claim is required in a v1.0 attestation".to_string(),
                ));
            }

            JwtSigner::Federation {
                trust_chain: trust_chain.clone(),
                alg: jwt.header.alg.clone(),
                kid: jwt.header.kid.clone(),
            }
        }
        ProtocolVersion::V13 => {
            let Some(x5c) = &jwt.header.x5c else {
                return Err(Error::Validation(
                    "x5c header is required in a v1.3 attestation".to_string(),
                ));
            };

            JwtSigner::X5c {
                x5c: x5c.clone(),
                alg: jwt.header.alg.clone(),
                kid: jwt.header.kid.clone(),
            }
        }
    };

    let result = verifier
        .verify_jwt(&signer, attestation_jwt)
        .await
        .map_err(|e| Error::Unexpected(format!("verifier failed to run: {e}")))?;
    if !result.verified {
        return Err(Error::SignatureVerification(
            "attestation signature is invalid".to_string(),
        ));
    }

    Ok(jwt)
}

/// Sign a Wallet Attestation JWT over the supplied claims.
///
/// The header carries the version's trust material; the signer completes it
/// with its `alg` and key reference.
///
/// # Errors
///
/// Returns an error if the claims cannot be serialized or the signer fails.
pub async fn create_wallet_attestation_jwt(
    signer: &impl JwsSigner, claims: &AttestationClaims, trust_material: &JwtSigner,
) -> Result<String> {
    let mut header = json!({"typ": JwtType::OauthClientAttestationJwt});
    match trust_material {
        JwtSigner::Federation { trust_chain, .. } => {
            header["trust_chain"] = json!(trust_chain);
        }
        JwtSigner::X5c { x5c, .. } => {
            header["x5c"] = json!(x5c);
        }
        JwtSigner::Jwk { .. } => {
            return Err(Error::Validation(
                "an attestation must carry a trust_chain or x5c header".to_string(),
            ));
        }
    }

    let claims = serde_json::to_value(claims)
        .map_err(|e| Error::Unexpected(format!("issue serializing claims: {e}")))?;
    let signed = signer
        .sign_jwt(header, claims)
        .await
        .map_err(|e| Error::Unexpected(format!("issue signing attestation: {e}")))?;

    Ok(signed.jwt)
}

/// Convenience constructor for attestation claims with a default 24 hour
/// expiry and a random `jti`-style nonce claim.
#[must_use]
pub fn attestation_claims(
    issuer: impl Into<String>, subject: impl Into<String>, wallet_jwk: PublicKeyJwk,
) -> AttestationClaims {
    let mut additional = Map::new();
    additional.insert("jti".to_string(), Value::String(generate::uri_token()));

    AttestationClaims {
        iss: issuer.into(),
        sub: subject.into(),
        exp: (Utc::now() + chrono::TimeDelta::hours(24)).timestamp(),
        cnf: Cnf { jwk: wallet_jwk },
        aal: None,
        additional,
    }
}
