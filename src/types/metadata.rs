//! # Verifier Metadata
//!
//! Relying party metadata across the two published metadata shapes (v1.0 and
//! v1.3), with a single capability projection so downstream logic never
//! re-checks which shape it is holding.

use serde::{Deserialize, Serialize};

use crate::jose::Jwks;
use crate::types::request::ClientMetadata;

/// JWE key-agreement / key-wrapping algorithms.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum AlgAlgorithm {
    /// Elliptic Curve Diffie-Hellman Ephemeral-Static.
    #[default]
    #[serde(rename = "ECDH-ES")]
    EcdhEs,

    /// ECDH-ES with AES 256 key wrapping.
    #[serde(rename = "ECDH-ES+A256KW")]
    EcdhEsA256Kw,

    /// RSAES OAEP using SHA-256.
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
}

/// JWE content encryption algorithms.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum EncAlgorithm {
    /// AES GCM with a 256-bit key.
    #[default]
    #[serde(rename = "A256GCM")]
    A256Gcm,

    /// AES GCM with a 128-bit key.
    #[serde(rename = "A128GCM")]
    A128Gcm,

    /// AES CBC with HMAC SHA-256.
    #[serde(rename = "A128CBC-HS256")]
    A128CbcHs256,
}

impl AlgAlgorithm {
    /// The JOSE `alg` identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EcdhEs => "ECDH-ES",
            Self::EcdhEsA256Kw => "ECDH-ES+A256KW",
            Self::RsaOaep256 => "RSA-OAEP-256",
        }
    }
}

/// Verifiable Presentation formats a Verifier or Wallet supports.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum VpFormat {
    /// W3C JWT JSON Verifiable Credential.
    #[serde(rename = "jwt_vc_json")]
    JwtVcJson {
        /// Supported `alg` values for the presented credential.
        #[serde(skip_serializing_if = "Option::is_none")]
        alg_values: Option<Vec<String>>,
    },

    /// ISO Mobile Documents or mdocs (ISO/IEC 18013 and ISO/IEC 23220 series).
    #[serde(rename = "mso_mdoc")]
    MsoMdoc {
        /// Supported COSE algorithm identifiers.
        #[serde(skip_serializing_if = "Option::is_none")]
        alg_values: Option<Vec<i64>>,
    },

    /// IETF SD-JWT VC.
    #[serde(rename = "dc+sd-jwt")]
    DcSdJwt {
        /// Algorithms supported for an Issuer-signed JWT of an SD-JWT.
        #[serde(rename = "sd-jwt_alg_values", skip_serializing_if = "Option::is_none")]
        sd_jwt_alg_values: Option<Vec<String>>,

        /// Algorithms supported for a Key Binding JWT (KB-JWT).
        #[serde(rename = "kb-jwt_alg_values", skip_serializing_if = "Option::is_none")]
        kb_jwt_alg_values: Option<Vec<String>>,
    },
}

/// Relying party Verifier metadata, polymorphic over the two published
/// shapes.
///
/// v1.0 carries singular JARM algorithm fields; v1.3 replaces them with an
/// array of supported content encryption algorithms. Deserialization tries
/// v1.0 first because its distinguishing field is required there.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VerifierMetadata {
    /// The v1.0 metadata shape with singular JARM algorithm fields.
    V10 {
        /// Public keys of the Verifier.
        jwks: Jwks,

        /// The JWE `alg` for encrypting Authorization Responses.
        authorization_encrypted_response_alg: AlgAlgorithm,

        /// The JWE `enc` for encrypting Authorization Responses.
        #[serde(skip_serializing_if = "Option::is_none")]
        authorization_encrypted_response_enc: Option<EncAlgorithm>,

        /// The JWS `alg` for signing Authorization Responses.
        #[serde(skip_serializing_if = "Option::is_none")]
        authorization_signed_response_alg: Option<String>,
    },

    /// The v1.3 metadata shape.
    V13 {
        /// Public keys of the Verifier.
        jwks: Jwks,

        /// Supported `enc` algorithms for encrypting responses.
        #[serde(skip_serializing_if = "Option::is_none")]
        encrypted_response_enc_values_supported: Option<Vec<EncAlgorithm>>,

        /// Presentation formats the Verifier supports.
        #[serde(skip_serializing_if = "Option::is_none")]
        vp_formats_supported: Option<Vec<VpFormat>>,
    },
}

impl Default for VerifierMetadata {
    fn default() -> Self {
        Self::V13 {
            jwks: Jwks::default(),
            encrypted_response_enc_values_supported: None,
            vp_formats_supported: None,
        }
    }
}

/// The response-encryption capabilities of a Verifier, projected once from
/// whichever metadata shape supplied them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseEncryption {
    /// Public keys of the Verifier.
    pub jwks: Jwks,

    /// Supported content encryption algorithms, most preferred first.
    pub supported_encodings: Option<Vec<EncAlgorithm>>,

    /// A fixed key-agreement algorithm, when the metadata pins one.
    pub fixed_alg: Option<AlgAlgorithm>,
}

impl VerifierMetadata {
    /// Project the response-encryption capabilities of this metadata.
    #[must_use]
    pub fn response_encryption(&self) -> ResponseEncryption {
        match self {
            Self::V10 {
                jwks,
                authorization_encrypted_response_alg,
                authorization_encrypted_response_enc,
                ..
            } => ResponseEncryption {
                jwks: jwks.clone(),
                supported_encodings: authorization_encrypted_response_enc
                    .clone()
                    .map(|enc| vec![enc]),
                fixed_alg: Some(authorization_encrypted_response_alg.clone()),
            },
            Self::V13 { jwks, encrypted_response_enc_values_supported, .. } => {
                ResponseEncryption {
                    jwks: jwks.clone(),
                    supported_encodings: encrypted_response_enc_values_supported.clone(),
                    fixed_alg: None,
                }
            }
        }
    }
}

impl ClientMetadata {
    /// Project the response-encryption capabilities of inline metadata.
    #[must_use]
    pub fn response_encryption(&self) -> ResponseEncryption {
        ResponseEncryption {
            jwks: self.jwks.clone().unwrap_or_default(),
            supported_encodings: self.encrypted_response_enc_values_supported.clone(),
            fixed_alg: None,
        }
    }
}

/// Wallet (Authorization Server) metadata shared with the Verifier when
/// retrieving a Request Object by reference with POST.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct WalletMetadata {
    /// Presentation formats the Wallet supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vp_formats_supported: Option<Vec<VpFormat>>,

    /// Client Identifier prefixes the Wallet supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id_prefixes_supported: Option<Vec<String>>,

    /// Supported algorithms for securing the Request Object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_object_signing_alg_values_supported: Option<Vec<String>>,

    /// Supported JWE algorithms for encrypted Authorization Responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_encryption_alg_values_supported: Option<Vec<AlgAlgorithm>>,

    /// Supported JWE methods for encrypted Authorization Responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_encryption_enc_values_supported: Option<Vec<EncAlgorithm>>,
}

/// The claims of an OpenID Federation entity configuration JWT, reduced to
/// the metadata this crate reads.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityConfiguration {
    /// The entity's published metadata.
    #[serde(default)]
    pub metadata: EntityMetadata,
}

/// The `metadata` claim of an entity configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityMetadata {
    /// Metadata the entity publishes in its credential verifier role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openid_credential_verifier: Option<VerifierMetadata>,
}
