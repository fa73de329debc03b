use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::JwtType;
use crate::jose::Jwks;
use crate::types::metadata::{EncAlgorithm, VpFormat};

/// Client Identifier prefixes indicate how the Wallet should interpret the
/// `client_id` in the process of Client identification, authentication, and
/// authorization.
///
/// The prefix determines which trust material the Verifier must present with
/// a signed Request Object. An unprefixed Client Identifier requires a
/// federation trust chain, the same as `openid_federation:`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientId {
    /// A hash of the leaf certificate passed with the request.
    ///
    /// For example, `x509_hash:Uvo3HtuIxuhC92rShpgqcT3YXwrqRxWEviRiA0OZszk`.
    X509Hash(String),

    /// An Entity Identifier as defined in OpenID Federation.
    ///
    /// For example, `openid_federation:https://verifier.example.com`.
    OpenIdFederation(String),

    /// An unprefixed Client Identifier.
    ///
    /// For example, `example-client`.
    Preregistered(String),
}

impl Default for ClientId {
    fn default() -> Self {
        Self::Preregistered(String::new())
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X509Hash(hash) => write!(f, "x509_hash:{hash}"),
            Self::OpenIdFederation(uri) => write!(f, "openid_federation:{uri}"),
            Self::Preregistered(id) => write!(f, "{id}"),
        }
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        #[allow(clippy::option_if_let_else)]
        if let Some(hash) = value.strip_prefix("x509_hash:") {
            Self::X509Hash(hash.to_string())
        } else if let Some(uri) = value.strip_prefix("openid_federation:") {
            Self::OpenIdFederation(uri.to_string())
        } else {
            Self::Preregistered(value)
        }
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl Serialize for ClientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let value = self.to_string();
        value.serialize(serializer)
    }
}

impl<'a> Deserialize<'a> for ClientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

/// The protected header of an Authorization Request Object JWT.
///
/// Which of `trust_chain` and `x5c` must be present depends on the
/// `client_id` prefix in the payload. The cross-field check happens during
/// signer resolution, not deserialization.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RequestObjectHeader {
    /// The signing algorithm.
    pub alg: String,

    /// Media type of the JWT. Must be `oauth-authz-req+jwt`.
    pub typ: JwtType,

    /// Identifier of the Verifier's signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// OpenID Federation trust chain, leaf entity configuration first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_chain: Option<Vec<String>>,

    /// Base64-encoded certificates, leaf first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,
}

/// The type of response expected from the Wallet (as Authorization Server).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ResponseType {
    /// A VP Token is returned in an Authorization Response.
    #[default]
    #[serde(rename = "vp_token")]
    VpToken,
}

/// The mechanism the Wallet uses when returning an Authorization Response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ResponseMode {
    /// The Wallet POSTs the Authorization Response to the Verifier's
    /// `response_uri` as plain form fields.
    #[serde(rename = "direct_post")]
    DirectPost,

    /// The Wallet POSTs a `response` form parameter containing a JWT-secured
    /// Authorization Response ([JARM](https://openid.net/specs/oauth-v2-jarm-final.html)).
    #[default]
    #[serde(rename = "direct_post.jwt")]
    DirectPostJwt,
}

/// The Authorization Request Object sent by the Verifier, either by value or
/// by reference, as defined in JWT-Secured Authorization Request (JAR)
/// [RFC9101](https://www.rfc-editor.org/rfc/rfc9101).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RequestObject {
    /// The Verifier's `client_id`, carrying an optional prefix.
    pub client_id: ClientId,

    /// The type of response expected from the Wallet.
    pub response_type: ResponseType,

    /// The mechanism to use when returning the Authorization Response.
    pub response_mode: ResponseMode,

    /// Binds the requested Verifiable Presentation(s) to this transaction.
    pub nonce: String,

    /// Client state, returned unchanged in the Authorization Response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// The DCQL query used to request Verifiable Presentations. Query
    /// semantics are the caller's concern; the value is carried opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcql_query: Option<Value>,

    /// The URI to which the Wallet sends the Authorization Response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_uri: Option<String>,

    /// The URI the Request Object was retrieved from, when sent by reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uri: Option<String>,

    /// Verifier metadata sent inline with the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<ClientMetadata>,

    /// The Wallet provided nonce used to mitigate replay attacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_nonce: Option<String>,

    /// A pre-defined scope value representing a presentation request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Claims not defined above are preserved, not rejected.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// The claims of the Request Object JWT: the Request Object itself plus its
/// JWT envelope claims.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationClaims {
    /// The Verifier's `client_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// The intended audience of the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Expiry as seconds since the epoch. Freshness is deliberately not
    /// checked during parsing — that is layered on by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// The Request Object attributes.
    #[serde(flatten)]
    pub request_object: RequestObject,
}

/// A successfully decoded and signature-verified Authorization Request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAuthorizeRequest {
    /// The Request Object JWT header.
    pub header: RequestObjectHeader,

    /// The Request Object JWT claims.
    pub claims: AuthorizationClaims,
}

/// Verifier metadata when sent directly in the `RequestObject`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClientMetadata {
    /// Public keys, such as those used by the Wallet for encryption of the
    /// Authorization Response. Allows the Verifier to pass ephemeral keys
    /// specific to this Authorization Request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks: Option<Jwks>,

    /// A list of supported `enc` algorithms that can be used for encrypting
    /// responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_response_enc_values_supported: Option<Vec<EncAlgorithm>>,

    /// An object defining the formats and proof types of Verifiable
    /// Presentations and Verifiable Credentials that a Verifier supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vp_formats_supported: Option<Vec<VpFormat>>,
}

/// HTTP method options available for use when the `request_uri` parameter is
/// included in the same request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RequestUriMethod {
    /// Requires the Wallet to send the request to retrieve the Request Object
    /// using the HTTP GET method.
    #[default]
    Get,

    /// Requires the Wallet to send the request to retrieve the Request Object
    /// using the HTTP POST method.
    Post,
}

/// Query parameters of an Authorization Request URL, as received. Validate
/// with [`crate::validate_authorization_request_params`] before use.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationRequestParams {
    /// The Verifier's `client_id`.
    #[serde(default)]
    pub client_id: String,

    /// The Request Object JWT, when sent by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    /// A URL to retrieve the Request Object from, when sent by reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uri: Option<String>,

    /// The HTTP method to use with `request_uri`. Case-insensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uri_method: Option<String>,
}

/// How the Request Object reaches the Wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transmission {
    /// The Request Object JWT is inline in the Authorization Request URL.
    Value {
        /// The compact Request Object JWT.
        request: String,
    },

    /// The Request Object must be retrieved from the Verifier.
    Reference {
        /// The URL to retrieve the Request Object from.
        request_uri: String,

        /// The HTTP method to use.
        method: RequestUriMethod,
    },
}

/// Normalized Authorization Request URL parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequestParams {
    /// The Verifier's `client_id`.
    pub client_id: String,

    /// How the Request Object is transmitted.
    pub transmission: Transmission,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_id_prefixes() {
        assert_eq!(
            ClientId::from("x509_hash:Uvo3Htu"),
            ClientId::X509Hash("Uvo3Htu".to_string())
        );
        assert_eq!(
            ClientId::from("openid_federation:https://verifier.io"),
            ClientId::OpenIdFederation("https://verifier.io".to_string())
        );

        // anything else falls through to pre-registered
        assert_eq!(
            ClientId::from("example-client"),
            ClientId::Preregistered("example-client".to_string())
        );
        assert_eq!(
            ClientId::from("x509_hash#not-the-wire-format"),
            ClientId::Preregistered("x509_hash#not-the-wire-format".to_string())
        );
    }

    #[test]
    fn client_id_round_trip() {
        for s in ["x509_hash:abc", "openid_federation:https://v.io", "plain-client"] {
            assert_eq!(ClientId::from(s).to_string(), s);
        }
    }

    #[test]
    fn unknown_claims_preserved() {
        let claims = json!({
            "iss": "openid_federation:https://verifier.io",
            "client_id": "openid_federation:https://verifier.io",
            "response_type": "vp_token",
            "response_mode": "direct_post.jwt",
            "nonce": "n-0S6_WzA2Mj",
            "custom_claim": {"answer": 42}
        });

        let decoded: AuthorizationClaims = serde_json::from_value(claims).unwrap();
        assert_eq!(
            decoded.request_object.additional["custom_claim"],
            json!({"answer": 42})
        );
        assert_eq!(decoded.request_object.response_mode, ResponseMode::DirectPostJwt);
    }

    #[test]
    fn wrong_response_type_rejected() {
        let claims = json!({
            "client_id": "client",
            "response_type": "code",
            "response_mode": "direct_post.jwt",
            "nonce": "n-0S6_WzA2Mj",
        });

        serde_json::from_value::<AuthorizationClaims>(claims).expect_err("should reject");
    }
}
