//! # Authorization Request Fetching
//!
//! Resolves an Authorization Request URL: validates its query parameters,
//! retrieves the Request Object (inline value or HTTP round-trip for the
//! by-reference form), and hands the JWT to the parser.

use anyhow::Context;
use tracing::instrument;

use crate::error::Error;
use crate::handlers::Result;
use crate::handlers::parse_request::parse_authorize_request;
use crate::provider::{HttpMethod, HttpRequest, Provider};
use crate::types::{
    AuthorizationRequestParams, ParsedAuthorizeRequest, RequestUriMethod, Transmission,
    ValidatedRequestParams, WalletMetadata,
};

/// Whether the Request Object arrived by value or by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendBy {
    /// The Request Object JWT was inline in the Authorization Request URL.
    Value,

    /// The Request Object was retrieved from the Verifier's `request_uri`.
    Reference,
}

/// The outcome of resolving an Authorization Request URL.
#[derive(Clone, Debug)]
pub struct FetchedAuthorizationRequest {
    /// The decoded and verified Authorization Request.
    pub request: ParsedAuthorizeRequest,

    /// The raw Request Object JWT, for callers that need to re-verify or
    /// archive it.
    pub request_object_jwt: String,

    /// How the Request Object was transmitted.
    pub send_by: SendBy,

    /// The validated Authorization Request URL parameters.
    pub params: ValidatedRequestParams,
}

/// Validate and normalize Authorization Request URL query parameters.
///
/// Exactly one of `request` and `request_uri` must be present, and
/// `request_uri_method` is only legal alongside `request_uri`.
///
/// # Errors
///
/// Returns [`Error::Validation`] on the mutual-exclusivity rules and
/// [`Error::InvalidRequestUriMethod`] when the method does not normalize to
/// `get` or `post`.
pub fn validate_authorization_request_params(
    params: AuthorizationRequestParams,
) -> Result<ValidatedRequestParams> {
    if params.client_id.is_empty() {
        return Err(Error::Validation("client_id is required".to_string()));
    }

    let method = params.request_uri_method.as_deref().map(normalize_method).transpose()?;

    let transmission = match (params.request, params.request_uri) {
        (Some(_), Some(_)) => {
            return Err(Error::Validation(
                "request and request_uri are mutually exclusive".to_string(),
            ));
        }
        (None, None) => {
            return Err(Error::Validation(
                "one of request or request_uri is required".to_string(),
            ));
        }
        (Some(request), None) => {
            if method.is_some() {
                return Err(Error::Validation(
                    "request_uri_method requires request_uri".to_string(),
                ));
            }
            Transmission::Value { request }
        }
        (None, Some(request_uri)) => {
            Transmission::Reference { request_uri, method: method.unwrap_or_default() }
        }
    };

    Ok(ValidatedRequestParams { client_id: params.client_id, transmission })
}

fn normalize_method(method: &str) -> Result<RequestUriMethod> {
    match method.to_ascii_lowercase().as_str() {
        "get" => Ok(RequestUriMethod::Get),
        "post" => Ok(RequestUriMethod::Post),
        other => Err(Error::InvalidRequestUriMethod(other.to_string())),
    }
}

/// Resolve an Authorization Request URL to a verified Authorization Request.
///
/// For the by-reference form, `wallet_metadata` and `wallet_nonce` are sent
/// as form fields when the Verifier asked for a POST retrieval.
///
/// # Errors
///
/// Propagates parameter validation and parser errors unwrapped. A non-2xx
/// retrieval status fails with [`Error::Transport`] carrying the status
/// code; any other transport failure is wrapped as [`Error::Unexpected`].
#[instrument(level = "debug", skip(provider, wallet_metadata, wallet_nonce))]
pub async fn fetch_authorization_request(
    provider: &impl Provider, authorize_request_url: &str,
    wallet_metadata: Option<&WalletMetadata>, wallet_nonce: Option<&str>,
) -> Result<FetchedAuthorizationRequest> {
    let url = url::Url::parse(authorize_request_url)
        .map_err(|e| Error::Validation(format!("invalid authorization request url: {e}")))?;
    let raw: AuthorizationRequestParams =
        serde_urlencoded::from_str(url.query().unwrap_or_default())
            .map_err(|e| Error::Validation(format!("invalid query parameters: {e}")))?;

    let params = validate_authorization_request_params(raw)?;

    let (request_object_jwt, send_by) = match &params.transmission {
        Transmission::Value { request } => (request.clone(), SendBy::Value),
        Transmission::Reference { request_uri, method } => {
            let jwt =
                retrieve(provider, request_uri, method, wallet_metadata, wallet_nonce).await?;
            (jwt, SendBy::Reference)
        }
    };

    let request = parse_authorize_request(provider, &request_object_jwt).await?;

    Ok(FetchedAuthorizationRequest { request, request_object_jwt, send_by, params })
}

// Retrieve the Request Object JWT from the Verifier's `request_uri`.
async fn retrieve(
    provider: &impl Provider, request_uri: &str, method: &RequestUriMethod,
    wallet_metadata: Option<&WalletMetadata>, wallet_nonce: Option<&str>,
) -> Result<String> {
    let request = match method {
        RequestUriMethod::Get => HttpRequest {
            url: request_uri.to_string(),
            method: HttpMethod::Get,
            form: None,
        },
        RequestUriMethod::Post => {
            let mut form = vec![];
            if let Some(metadata) = wallet_metadata {
                let json = serde_json::to_string(metadata)
                    .context("serializing wallet_metadata")?;
                form.push(("wallet_metadata".to_string(), json));
            }
            if let Some(nonce) = wallet_nonce {
                form.push(("wallet_nonce".to_string(), nonce.to_string()));
            }

            HttpRequest {
                url: request_uri.to_string(),
                method: HttpMethod::Post,
                form: Some(form),
            }
        }
    };

    let response = provider
        .fetch(request)
        .await
        .map_err(|e| Error::Unexpected(format!("failed to retrieve request object: {e}")))?;
    if !response.is_success() {
        return Err(Error::Transport {
            status: response.status,
            message: format!("request_uri returned status {}", response.status),
        });
    }

    Ok(response.body)
}
