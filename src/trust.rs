//! # Trust Resolution
//!
//! Recovers Verifier key material from an OpenID Federation trust chain.
//!
//! The first chain entry is the relying party's self-issued entity
//! configuration JWT. It is decoded, not verified: validating the chain's own
//! signatures up to a trust anchor is the business of a federation trust
//! chain validator outside this crate. This module only recovers the claimed
//! metadata so the request signature can be checked against a published key.

use serde_json::Value;

use crate::Error;
use crate::handlers::Result;
use crate::jose::{self, PublicKeyJwk};
use crate::types::{EntityConfiguration, VerifierMetadata};

/// Extract the relying party's Verifier metadata from the first entry of a
/// federation trust chain.
///
/// # Errors
///
/// Returns [`Error::TrustResolution`] when the chain is empty, the entity
/// configuration cannot be decoded, the `openid_credential_verifier`
/// metadata claim is absent, or its key set is empty.
pub fn extract_rp_metadata(trust_chain: &[String]) -> Result<VerifierMetadata> {
    let Some(entity_jwt) = trust_chain.first() else {
        return Err(Error::TrustResolution("trust chain is empty".to_string()));
    };

    let entity = jose::decode::<Value, EntityConfiguration>(entity_jwt)
        .map_err(|e| Error::TrustResolution(format!("invalid entity configuration: {e}")))?;

    let Some(metadata) = entity.claims.metadata.openid_credential_verifier else {
        return Err(Error::TrustResolution(
            "entity configuration has no openid_credential_verifier metadata".to_string(),
        ));
    };

    if metadata.response_encryption().jwks.keys.is_empty() {
        return Err(Error::TrustResolution(
            "verifier metadata has no keys".to_string(),
        ));
    }

    Ok(metadata)
}

/// Find a key in a JWKS by `kid`, falling back to the first key when no
/// `kid` is given.
///
/// # Errors
///
/// Returns [`Error::TrustResolution`] when no key matches the `kid` or the
/// key set is empty.
pub fn find_key_by_kid<'a>(
    keys: &'a [PublicKeyJwk], kid: Option<&str>,
) -> Result<&'a PublicKeyJwk> {
    match kid {
        Some(kid) => keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| Error::TrustResolution(format!("no key found for kid {kid}"))),
        None => keys
            .first()
            .ok_or_else(|| Error::TrustResolution("key set is empty".to_string())),
    }
}
