//! # Authorization Response Building
//!
//! Builds the JARM response to a verified Authorization Request: resolves
//! the Verifier's encryption key and algorithms from whichever metadata
//! source the `client_id` prefix permits, optionally signs the payload, and
//! encrypts it to the selected key.
//!
//! The JWE `apv` is the request's own nonce and the `apu` is fresh wallet
//! randomness, binding the response to the exact request it answers.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{TimeDelta, Utc};
use serde_json::json;
use tracing::instrument;

use crate::JwtType;
use crate::error::Error;
use crate::handlers::Result;
use crate::jose::PublicKeyJwk;
use crate::provider::{EncryptionParams, Provider};
use crate::types::{
    AlgAlgorithm, AuthorizationResponse, AuthorizationResponsePayload, ClientId,
    CreateResponseRequest, EncAlgorithm, Jarm, ResponseEncryption,
};

const APU_LEN: usize = 32;
const DEFAULT_EXPIRY_SECS: i64 = 600;

/// Build a JARM-encrypted (and optionally signed) Authorization Response.
///
/// # Errors
///
/// All failures — prefix/metadata mismatch, missing encryption key, signing
/// or encryption failure — surface as [`Error::ResponseConstruction`] with a
/// cause-specific message.
#[instrument(level = "debug", skip_all)]
pub async fn create_authorization_response(
    provider: &impl Provider, request: CreateResponseRequest,
) -> Result<AuthorizationResponse> {
    let request_object = &request.request_object;

    // 1. resolve the metadata source the client_id prefix permits
    let capabilities = resolve_capabilities(&request)?;

    // 2-3. resolve algorithm and encoding
    let alg = request
        .encryption_alg
        .clone()
        .or_else(|| capabilities.fixed_alg.clone())
        .unwrap_or(AlgAlgorithm::EcdhEs);
    let enc = resolve_encoding(request.encryption_enc.clone(), &capabilities);

    // 4. select an encryption-capable key compatible with the negotiated alg
    let recipient_jwk = encryption_key(&capabilities.jwks.keys, &alg)?.clone();

    // 5. construct the payload, signing when asked to
    let mut payload = AuthorizationResponsePayload {
        vp_token: request.vp_token.clone(),
        state: request_object.state.clone(),
        aud: None,
        iss: None,
        exp: None,
    };

    let plaintext = if let Some(signing) = &request.signing {
        payload.aud = Some(request_object.client_id.to_string());
        payload.iss = Some(signing.wallet_client_id.clone());
        let exp = signing.exp.unwrap_or_else(|| {
            Utc::now() + TimeDelta::seconds(DEFAULT_EXPIRY_SECS)
        });
        payload.exp = Some(exp.timestamp());

        let claims = serde_json::to_value(&payload).map_err(|e| {
            Error::ResponseConstruction(format!("issue serializing response payload: {e}"))
        })?;
        let signed = provider
            .sign_jwt(json!({"typ": JwtType::Jwt}), claims)
            .await
            .map_err(|e| {
                Error::ResponseConstruction(format!("issue signing response: {e}"))
            })?;
        signed.jwt
    } else {
        serde_json::to_string(&payload).map_err(|e| {
            Error::ResponseConstruction(format!("issue serializing response payload: {e}"))
        })?
    };

    // 6. bind the response to the request
    let apu = Base64UrlUnpadded::encode_string(&provider.random_bytes(APU_LEN));
    let apv = Base64UrlUnpadded::encode_string(request_object.nonce.as_bytes());

    // 7. encrypt
    let params = EncryptionParams { recipient_jwk, alg, enc, apu, apv };
    let encrypted = provider.encrypt_jwe(&params, &plaintext).await.map_err(|e| {
        Error::ResponseConstruction(format!("issue encrypting response: {e}"))
    })?;

    Ok(AuthorizationResponse {
        payload,
        jarm: Jarm { encryption_jwk: encrypted.encryption_jwk, response: encrypted.jwe },
    })
}

// The metadata source depends on the `client_id` prefix: an x509_hash client
// must carry its metadata inline; a federation client must not, since its
// metadata comes from the validated trust chain.
fn resolve_capabilities(request: &CreateResponseRequest) -> Result<ResponseEncryption> {
    let request_object = &request.request_object;

    match &request_object.client_id {
        ClientId::X509Hash(_) => request_object.client_metadata.as_ref().map_or_else(
            || {
                Err(Error::ResponseConstruction(
                    "client_metadata is required for an x509_hash client".to_string(),
                ))
            },
            |metadata| Ok(metadata.response_encryption()),
        ),
        ClientId::OpenIdFederation(_) | ClientId::Preregistered(_) => {
            if request_object.client_metadata.is_some() {
                return Err(Error::ResponseConstruction(
                    "inline client_metadata is not allowed for a federation client".to_string(),
                ));
            }
            request.verifier_metadata.as_ref().map_or_else(
                || {
                    Err(Error::ResponseConstruction(
                        "verifier metadata is required for a federation client".to_string(),
                    ))
                },
                |metadata| Ok(metadata.response_encryption()),
            )
        }
    }
}

// An explicit encoding wins only when the Verifier supports it; otherwise
// the Verifier's first supported value, falling back to A256GCM.
fn resolve_encoding(
    requested: Option<EncAlgorithm>, capabilities: &ResponseEncryption,
) -> EncAlgorithm {
    match (&requested, &capabilities.supported_encodings) {
        (Some(enc), Some(supported)) => {
            if supported.contains(enc) {
                enc.clone()
            } else {
                supported.first().cloned().unwrap_or_default()
            }
        }
        (Some(enc), None) => enc.clone(),
        (None, Some(supported)) => supported.first().cloned().unwrap_or_default(),
        (None, None) => EncAlgorithm::default(),
    }
}

// First key usable for encryption under the negotiated algorithm: `use` is
// "enc" or unrestricted, and the key's `alg` and `kty` do not contradict it.
fn encryption_key<'a>(
    keys: &'a [PublicKeyJwk], alg: &AlgAlgorithm,
) -> Result<&'a PublicKeyJwk> {
    keys.iter()
        .filter(|k| k.use_.as_deref().is_none_or(|u| u == "enc"))
        .find(|k| key_supports_alg(k, alg))
        .ok_or_else(|| {
            Error::ResponseConstruction(format!(
                "no encryption key compatible with {} in verifier jwks",
                alg.as_str()
            ))
        })
}

// A key's explicit `alg` must match the negotiated one; an absent `alg`
// falls back to the key type matching the algorithm family.
fn key_supports_alg(key: &PublicKeyJwk, alg: &AlgAlgorithm) -> bool {
    match &key.alg {
        Some(key_alg) => key_alg == alg.as_str(),
        None => match alg {
            AlgAlgorithm::EcdhEs | AlgAlgorithm::EcdhEsA256Kw => {
                key.kty == "EC" || key.kty == "OKP"
            }
            AlgAlgorithm::RsaOaep256 => key.kty == "RSA",
        },
    }
}
