//! # Authorization Request Parsing
//!
//! Decodes an untrusted Request Object JWT, resolves the Verifier's signing
//! key from the trust material matching the `client_id` prefix, and checks
//! the signature through the injected verifier.
//!
//! Processing order is fixed: structural decode and schema validation come
//! first, then trust resolution, then signature verification. A malformed
//! token never reaches the verification capability.
//!
//! For federation-resolved keys this module resolves the published JWK from
//! the trust chain and verifies directly against it, rather than handing the
//! whole chain to the verifier. The injected verifier is therefore only
//! trusted to check a signature against a given key, not to evaluate
//! federation trust.

use tracing::instrument;

use crate::error::Error;
use crate::handlers::Result;
use crate::provider::{JwtSigner, Provider};
use crate::types::{
    AuthorizationClaims, ClientId, ParsedAuthorizeRequest, RequestObjectHeader,
};
use crate::{JwtType, jose, trust};

/// Decode and verify an Authorization Request Object JWT.
///
/// The `exp` claim is deliberately not checked here — freshness policy is
/// layered on by the caller.
///
/// # Errors
///
/// Returns [`Error::StructuralParse`] or [`Error::Validation`] when the JWT
/// cannot be decoded, [`Error::TrustResolution`] when the header lacks the
/// trust material its `client_id` prefix calls for, and
/// [`Error::SignatureVerification`] when the signature does not check out.
#[instrument(level = "debug", skip_all)]
pub async fn parse_authorize_request(
    provider: &impl Provider, request_object_jwt: &str,
) -> Result<ParsedAuthorizeRequest> {
    let jwt =
        jose::decode::<RequestObjectHeader, AuthorizationClaims>(request_object_jwt)?;

    if jwt.header.typ != JwtType::OauthAuthzReqJwt {
        return Err(Error::Validation(format!(
            "unexpected typ header: {}",
            jwt.header.typ
        )));
    }

    let signer = resolve_signer(&jwt.header, &jwt.claims.request_object.client_id)?;

    let result = provider
        .verify_jwt(&signer, request_object_jwt)
        .await
        .map_err(|e| Error::Unexpected(format!("verifier failed to run: {e}")))?;
    if !result.verified {
        return Err(Error::SignatureVerification(format!(
            "request object signature is invalid for client {}",
            jwt.claims.request_object.client_id
        )));
    }

    Ok(ParsedAuthorizeRequest { header: jwt.header, claims: jwt.claims })
}

// Build the trust material descriptor the verifier should use, based on the
// `client_id` prefix.
fn resolve_signer(header: &RequestObjectHeader, client_id: &ClientId) -> Result<JwtSigner> {
    match client_id {
        ClientId::X509Hash(_) => {
            let Some(x5c) = &header.x5c else {
                return Err(Error::TrustResolution(
                    "x5c header is required for an x509_hash client".to_string(),
                ));
            };
            if x5c.is_empty() {
                return Err(Error::TrustResolution("x5c header is empty".to_string()));
            }

            Ok(JwtSigner::X5c {
                x5c: x5c.clone(),
                alg: header.alg.clone(),
                kid: header.kid.clone(),
            })
        }

        // an unprefixed client_id requires a trust chain, same as an
        // openid_federation one
        ClientId::OpenIdFederation(_) | ClientId::Preregistered(_) => {
            let Some(trust_chain) = &header.trust_chain else {
                return Err(Error::TrustResolution(
                    "trust_chain header is required".to_string(),
                ));
            };
            let Some(kid) = &header.kid else {
                return Err(Error::TrustResolution("kid header is required".to_string()));
            };

            let metadata = trust::extract_rp_metadata(trust_chain)?;
            let keys = metadata.response_encryption().jwks.keys;
            let public_jwk = trust::find_key_by_kid(&keys, Some(kid))?.clone();

            Ok(JwtSigner::Jwk { public_jwk })
        }
    }
}
