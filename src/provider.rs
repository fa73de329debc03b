//! # Provider
//!
//! Capabilities the host application injects into the engine: JWT signature
//! verification, JWS signing, JWE encryption, HTTP transport, and secure
//! randomness. The engine decides *which* key material a capability should
//! use; the capability decides *how* the cryptographic or network operation
//! is performed.

use std::future::Future;

use anyhow::Result;
use serde_json::Value;

use crate::jose::PublicKeyJwk;
use crate::types::{AlgAlgorithm, EncAlgorithm};

/// Wallet provider trait bundling all injected capabilities.
pub trait Provider:
    JwtVerifier + JwsSigner + JweEncryptor + HttpClient + SecureRandom + Clone
{
}

/// Trust material to verify a compact JWT against, built fresh per
/// verification attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JwtSigner {
    /// Verify directly against a resolved public key.
    Jwk {
        /// The resolved public key.
        public_jwk: PublicKeyJwk,
    },

    /// Verify against the leaf certificate of an X.509 chain.
    X5c {
        /// Base64-encoded certificates, leaf first.
        x5c: Vec<String>,

        /// The signing algorithm from the JWT header.
        alg: String,

        /// The key identifier from the JWT header, when present.
        kid: Option<String>,
    },

    /// Verify against an OpenID Federation trust chain.
    Federation {
        /// The trust chain, leaf entity configuration first.
        trust_chain: Vec<String>,

        /// The signing algorithm from the JWT header.
        alg: String,

        /// The key identifier from the JWT header, when present.
        kid: Option<String>,
    },
}

/// Outcome of a signature verification attempt.
#[derive(Clone, Debug, Default)]
pub struct VerifyResult {
    /// Whether the signature checked out against the supplied trust material.
    pub verified: bool,

    /// The public key the verifier settled on, when it can report one.
    pub signer_jwk: Option<PublicKeyJwk>,
}

/// JWT signature verification capability.
pub trait JwtVerifier: Send + Sync {
    /// Verify the compact JWT against the supplied trust material.
    ///
    /// An `Err` means the verifier could not run at all; a `verified: false`
    /// result means it ran and the signature did not check out.
    fn verify_jwt(
        &self, signer: &JwtSigner, compact: &str,
    ) -> impl Future<Output = Result<VerifyResult>> + Send;
}

/// A freshly signed compact JWT.
#[derive(Clone, Debug, Default)]
pub struct SignedJwt {
    /// The compact serialization.
    pub jwt: String,

    /// The public key corresponding to the signing key.
    pub signer_jwk: Option<PublicKeyJwk>,
}

/// JWS signing capability.
///
/// The signer completes the supplied header with its own `alg` and key
/// reference (`kid` or `jwk`) before signing.
pub trait JwsSigner: Send + Sync {
    /// Sign the header and claims, returning the compact JWT.
    fn sign_jwt(
        &self, header: Value, claims: Value,
    ) -> impl Future<Output = Result<SignedJwt>> + Send;
}

/// Parameters for encrypting an Authorization Response as a JWE.
#[derive(Clone, Debug)]
pub struct EncryptionParams {
    /// The recipient's public key.
    pub recipient_jwk: PublicKeyJwk,

    /// Key-agreement / key-wrapping algorithm.
    pub alg: AlgAlgorithm,

    /// Content encryption algorithm.
    pub enc: EncAlgorithm,

    /// Base64url-encoded Agreement PartyUInfo (fresh wallet randomness).
    pub apu: String,

    /// Base64url-encoded Agreement PartyVInfo (the request nonce).
    pub apv: String,
}

/// An encrypted JWE together with the key that was used.
#[derive(Clone, Debug, Default)]
pub struct EncryptedJwe {
    /// The compact JWE serialization.
    pub jwe: String,

    /// The recipient public key used for encryption.
    pub encryption_jwk: PublicKeyJwk,
}

/// JWE encryption capability.
pub trait JweEncryptor: Send + Sync {
    /// Encrypt the plaintext to the recipient described by `params`.
    fn encrypt_jwe(
        &self, params: &EncryptionParams, plaintext: &str,
    ) -> impl Future<Output = Result<EncryptedJwe>> + Send;
}

/// HTTP method used when retrieving a Request Object by reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET.
    #[default]
    Get,

    /// HTTP POST.
    Post,
}

/// An outgoing HTTP request.
#[derive(Clone, Debug, Default)]
pub struct HttpRequest {
    /// The URL to call.
    pub url: String,

    /// The HTTP method.
    pub method: HttpMethod,

    /// Form fields for an `application/x-www-form-urlencoded` POST body.
    pub form: Option<Vec<(String, String)>>,
}

/// The response to an HTTP request.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,

    /// The response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP transport capability. Timeout and retry policy belong to the
/// implementation, not to this crate.
pub trait HttpClient: Send + Sync {
    /// Execute the HTTP request.
    fn fetch(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Cryptographically secure randomness capability.
pub trait SecureRandom: Send + Sync {
    /// Return `len` random bytes.
    fn random_bytes(&self, len: usize) -> Vec<u8>;
}
