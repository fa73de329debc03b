use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jose::PublicKeyJwk;
use crate::types::metadata::{AlgAlgorithm, EncAlgorithm, VerifierMetadata};
use crate::types::request::RequestObject;

/// A request to build a JARM-encrypted Authorization Response to a verified
/// Authorization Request.
#[derive(Clone, Debug, Default)]
pub struct CreateResponseRequest {
    /// The verified Request Object being answered.
    pub request_object: RequestObject,

    /// VP Tokens keyed by DCQL credential query id.
    pub vp_token: HashMap<String, Vec<String>>,

    /// Verifier metadata resolved outside the request, e.g. from a validated
    /// federation trust chain. Required unless the request carries inline
    /// `client_metadata`.
    pub verifier_metadata: Option<VerifierMetadata>,

    /// When set, the response payload is signed before encryption.
    pub signing: Option<ResponseSigning>,

    /// Override the JWE key-agreement algorithm. Defaults to `ECDH-ES`.
    pub encryption_alg: Option<AlgAlgorithm>,

    /// Override the JWE content encryption algorithm. Defaults to the
    /// Verifier's first supported value, else `A256GCM`.
    pub encryption_enc: Option<EncAlgorithm>,
}

/// Settings for the signed-and-encrypted response variant.
#[derive(Clone, Debug, Default)]
pub struct ResponseSigning {
    /// The Wallet's own client identifier, used as the `iss` claim.
    pub wallet_client_id: String,

    /// Expiry of the signed response. Defaults to 10 minutes from now.
    pub exp: Option<DateTime<Utc>>,
}

/// The claims of an Authorization Response, encrypted (and optionally
/// signed) before transmission.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationResponsePayload {
    /// VP Tokens keyed by DCQL credential query id.
    pub vp_token: HashMap<String, Vec<String>>,

    /// The client state value from the Authorization Request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// The Verifier's `client_id`. Signed variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// The Wallet's `client_id`. Signed variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Expiry as seconds since the epoch. Signed variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The JWT-secured form of the Authorization Response.
#[derive(Clone, Debug, Default)]
pub struct Jarm {
    /// The Verifier key the response was encrypted to.
    pub encryption_jwk: PublicKeyJwk,

    /// The compact JWE to send as the `response` form parameter.
    pub response: String,
}

/// A built Authorization Response, ready for submission to the Verifier's
/// `response_uri`.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationResponse {
    /// The plaintext payload that was encrypted.
    pub payload: AuthorizationResponsePayload,

    /// The JWT-secured response.
    pub jarm: Jarm,
}
