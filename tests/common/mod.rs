//! Mock provider for wallet engine tests.
//!
//! Records every callback invocation so tests can assert what the engine
//! did (and did not) delegate, and lets individual tests script signature
//! outcomes, HTTP responses, and randomness.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use oid4vp_wallet::provider::{
    EncryptedJwe, EncryptionParams, HttpClient, HttpRequest, HttpResponse, JweEncryptor,
    JwsSigner, JwtSigner, JwtVerifier, Provider, SecureRandom, SignedJwt, VerifyResult,
};
use serde_json::Value;

#[derive(Clone, Default)]
pub struct MockProvider {
    pub verify_calls: Arc<Mutex<Vec<JwtSigner>>>,
    pub verify_outcome: Arc<Mutex<bool>>,
    pub http_calls: Arc<Mutex<Vec<HttpRequest>>>,
    pub http_responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    pub scripted_random: Arc<Mutex<Vec<Vec<u8>>>>,
    random_counter: Arc<Mutex<u8>>,
}

impl MockProvider {
    pub fn new() -> Self {
        let provider = Self::default();
        *provider.verify_outcome.lock().unwrap() = true;
        provider
    }

    /// All subsequent verifications report an invalid signature.
    pub fn reject_signatures(&self) {
        *self.verify_outcome.lock().unwrap() = false;
    }

    pub fn respond_to(&self, url: &str, status: u16, body: &str) {
        self.http_responses.lock().unwrap().insert(
            url.to_string(),
            HttpResponse { status, body: body.to_string() },
        );
    }

    /// Queue a buffer to be returned by the next `random_bytes` call.
    pub fn script_random(&self, bytes: Vec<u8>) {
        self.scripted_random.lock().unwrap().push(bytes);
    }

    pub fn verify_call_count(&self) -> usize {
        self.verify_calls.lock().unwrap().len()
    }
}

impl Provider for MockProvider {}

impl JwtVerifier for MockProvider {
    async fn verify_jwt(&self, signer: &JwtSigner, _compact: &str) -> Result<VerifyResult> {
        self.verify_calls.lock().unwrap().push(signer.clone());
        Ok(VerifyResult { verified: *self.verify_outcome.lock().unwrap(), signer_jwk: None })
    }
}

impl JwsSigner for MockProvider {
    async fn sign_jwt(&self, mut header: Value, claims: Value) -> Result<SignedJwt> {
        header["alg"] = Value::String("ES256".to_string());
        Ok(SignedJwt { jwt: make_jwt(&header, &claims), signer_jwk: None })
    }
}

impl JweEncryptor for MockProvider {
    async fn encrypt_jwe(&self, params: &EncryptionParams, plaintext: &str) -> Result<EncryptedJwe> {
        // not a real JWE: an inspectable envelope for assertions
        let envelope = serde_json::json!({
            "alg": params.alg,
            "enc": params.enc,
            "apu": params.apu,
            "apv": params.apv,
            "kid": params.recipient_jwk.kid,
            "plaintext": plaintext,
        });
        Ok(EncryptedJwe {
            jwe: envelope.to_string(),
            encryption_jwk: params.recipient_jwk.clone(),
        })
    }
}

impl HttpClient for MockProvider {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.http_calls.lock().unwrap().push(request.clone());
        let responses = self.http_responses.lock().unwrap();
        Ok(responses
            .get(&request.url)
            .cloned()
            .unwrap_or(HttpResponse { status: 404, body: String::new() }))
    }
}

impl SecureRandom for MockProvider {
    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut scripted = self.scripted_random.lock().unwrap();
        if !scripted.is_empty() {
            return scripted.remove(0);
        }

        // deterministic but distinct across calls
        let mut counter = self.random_counter.lock().unwrap();
        *counter = counter.wrapping_add(1);
        vec![*counter; len]
    }
}

/// Encode an unsigned compact JWT from JSON header and claims.
pub fn make_jwt(header: &Value, claims: &Value) -> String {
    format!(
        "{}.{}.ZmFrZS1zaWc",
        Base64UrlUnpadded::encode_string(header.to_string().as_bytes()),
        Base64UrlUnpadded::encode_string(claims.to_string().as_bytes())
    )
}

/// An entity configuration JWT publishing the given verifier keys.
pub fn entity_configuration(keys: &Value) -> String {
    make_jwt(
        &serde_json::json!({"alg": "ES256", "typ": "entity-statement+jwt"}),
        &serde_json::json!({
            "iss": "https://verifier.io",
            "metadata": {
                "openid_credential_verifier": {
                    "jwks": {"keys": keys},
                    "encrypted_response_enc_values_supported": ["A256GCM"],
                }
            }
        }),
    )
}
