//! Tests for Authorization Response construction.

mod common;

use std::collections::HashMap;

use base64ct::{Base64UrlUnpadded, Encoding};
use common::MockProvider;
use oid4vp_wallet::jose::{self, Jwks, PublicKeyJwk};
use oid4vp_wallet::{
    ClientId, ClientMetadata, CreateResponseRequest, EncAlgorithm, Error, RequestObject,
    ResponseSigning, VerifierMetadata, create_authorization_response,
};
use serde_json::Value;

fn enc_key(kid: &str) -> PublicKeyJwk {
    PublicKeyJwk {
        kty: "EC".to_string(),
        crv: Some("P-256".to_string()),
        x: Some("abc".to_string()),
        kid: Some(kid.to_string()),
        use_: Some("enc".to_string()),
        ..PublicKeyJwk::default()
    }
}

fn x509_request(keys: Vec<PublicKeyJwk>) -> CreateResponseRequest {
    CreateResponseRequest {
        request_object: RequestObject {
            client_id: ClientId::X509Hash("Uvo3Htu".to_string()),
            nonce: "n-0S6_WzA2Mj".to_string(),
            state: Some("af0ifjsldkj".to_string()),
            client_metadata: Some(ClientMetadata {
                jwks: Some(Jwks { keys }),
                encrypted_response_enc_values_supported: Some(vec![EncAlgorithm::A128Gcm]),
                vp_formats_supported: None,
            }),
            ..RequestObject::default()
        },
        vp_token: HashMap::from([("my_credential".to_string(), vec!["eyJ.etc".to_string()])]),
        ..CreateResponseRequest::default()
    }
}

fn envelope(jwe: &str) -> Value {
    serde_json::from_str(jwe).expect("mock encryptor emits JSON")
}

#[tokio::test]
async fn empty_jwks_fails() {
    let provider = MockProvider::new();

    let err = create_authorization_response(&provider, x509_request(vec![]))
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::ResponseConstruction(_)));
}

// A federation client's metadata comes from its trust chain; inline
// client_metadata is a protocol violation.
#[tokio::test]
async fn federation_rejects_inline_metadata() {
    let provider = MockProvider::new();
    let mut request = x509_request(vec![enc_key("enc-1")]);
    request.request_object.client_id =
        ClientId::OpenIdFederation("https://verifier.io".to_string());

    let err = create_authorization_response(&provider, request)
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::ResponseConstruction(_)));
}

#[tokio::test]
async fn federation_uses_resolved_metadata() {
    let provider = MockProvider::new();
    let mut request = x509_request(vec![]);
    request.request_object.client_id =
        ClientId::OpenIdFederation("https://verifier.io".to_string());
    request.request_object.client_metadata = None;
    request.verifier_metadata = Some(VerifierMetadata::V13 {
        jwks: Jwks { keys: vec![enc_key("fed-key")] },
        encrypted_response_enc_values_supported: Some(vec![EncAlgorithm::A256Gcm]),
        vp_formats_supported: None,
    });

    let response = create_authorization_response(&provider, request)
        .await
        .expect("should build");

    assert_eq!(response.jarm.encryption_jwk.kid.as_deref(), Some("fed-key"));
    assert_eq!(envelope(&response.jarm.response)["enc"], "A256GCM");
}

// The apv binds the response to the request nonce; the apu is fresh per
// response.
#[tokio::test]
async fn response_is_bound_to_request_nonce() {
    let provider = MockProvider::new();
    provider.script_random(vec![1u8; 32]);
    provider.script_random(vec![2u8; 32]);

    let first = create_authorization_response(&provider, x509_request(vec![enc_key("enc-1")]))
        .await
        .expect("should build");
    let second = create_authorization_response(&provider, x509_request(vec![enc_key("enc-1")]))
        .await
        .expect("should build");

    let (first, second) = (envelope(&first.jarm.response), envelope(&second.jarm.response));

    let expected_apv = Base64UrlUnpadded::encode_string("n-0S6_WzA2Mj".as_bytes());
    assert_eq!(first["apv"], expected_apv.as_str());
    assert_eq!(second["apv"], expected_apv.as_str());
    assert_ne!(first["apu"], second["apu"]);
}

#[tokio::test]
async fn encryption_only_payload() {
    let provider = MockProvider::new();

    let response = create_authorization_response(&provider, x509_request(vec![enc_key("enc-1")]))
        .await
        .expect("should build");

    let plaintext: Value =
        serde_json::from_str(envelope(&response.jarm.response)["plaintext"].as_str().unwrap())
            .expect("plaintext is the payload JSON");
    assert_eq!(plaintext["state"], "af0ifjsldkj");
    assert_eq!(plaintext["vp_token"]["my_credential"][0], "eyJ.etc");
    assert!(plaintext.get("iss").is_none());
    assert!(plaintext.get("aud").is_none());
}

#[tokio::test]
async fn signed_and_encrypted_payload() {
    let provider = MockProvider::new();
    let mut request = x509_request(vec![enc_key("enc-1")]);
    request.signing = Some(ResponseSigning {
        wallet_client_id: "https://wallet.example".to_string(),
        exp: None,
    });

    let response = create_authorization_response(&provider, request)
        .await
        .expect("should build");

    // the plaintext is now a signed JWT around the payload
    let plaintext = envelope(&response.jarm.response)["plaintext"]
        .as_str()
        .unwrap()
        .to_string();
    let signed: jose::Jwt<Value, Value> = jose::decode(&plaintext).expect("should decode");

    assert_eq!(signed.claims["aud"], "x509_hash:Uvo3Htu");
    assert_eq!(signed.claims["iss"], "https://wallet.example");
    assert!(signed.claims["exp"].as_i64().unwrap() > chrono::Utc::now().timestamp());
}

// A key whose alg contradicts the negotiated algorithm is skipped even when
// it is listed first in the Verifier's JWKS.
#[tokio::test]
async fn key_must_match_negotiated_algorithm() {
    let provider = MockProvider::new();
    let rsa_key = PublicKeyJwk {
        kty: "RSA".to_string(),
        kid: Some("rsa-key".to_string()),
        use_: Some("enc".to_string()),
        alg: Some("RSA-OAEP-256".to_string()),
        ..PublicKeyJwk::default()
    };

    let response =
        create_authorization_response(&provider, x509_request(vec![rsa_key, enc_key("ecdh-key")]))
            .await
            .expect("should build");

    // ECDH-ES is the negotiated default; the RSA key cannot serve it
    assert_eq!(response.jarm.encryption_jwk.kid.as_deref(), Some("ecdh-key"));
}

// The caller's requested encoding is honoured only when the Verifier
// supports it.
#[tokio::test]
async fn unsupported_encoding_falls_back() {
    let provider = MockProvider::new();
    let mut request = x509_request(vec![enc_key("enc-1")]);
    request.encryption_enc = Some(EncAlgorithm::A128CbcHs256);

    let response = create_authorization_response(&provider, request)
        .await
        .expect("should build");

    // verifier supports only A128GCM
    assert_eq!(envelope(&response.jarm.response)["enc"], "A128GCM");
}
