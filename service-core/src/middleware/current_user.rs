//! Request-scoped caller identity.
//!
//! The storefront keeps the session JWT inside a `session` cookie whose value
//! is base64-encoded JSON (`{"jwt":"..."}`). Service-to-service callers may
//! send the same JWT as a bearer token instead. Handlers that take
//! [`CurrentUser`] reject anonymous requests with 401.

use crate::error::AppError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use base64::{Engine as _, engine::general_purpose};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "session";

/// Claims carried by a session JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Serialize, Deserialize)]
struct SessionCookie {
    jwt: String,
}

/// HS256 keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Session tokens are not required to expire; `exp` is still checked when present.
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn sign(&self, claims: &UserClaims) -> Result<String, anyhow::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))
    }

    pub fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        decode::<UserClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AppError::not_authorized()
            })
    }
}

/// Build the `session` cookie value for a signed JWT.
pub fn session_cookie_value(jwt: &str) -> String {
    let json = serde_json::json!({ "jwt": jwt }).to_string();
    general_purpose::STANDARD.encode(json)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let raw = jar.get(SESSION_COOKIE)?.value().to_string();
    let decoded = general_purpose::STANDARD.decode(raw).ok()?;
    let cookie: SessionCookie = serde_json::from_slice(&decoded).ok()?;
    Some(cookie.jwt)
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: AsRef<SessionKeys> + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| session_token(&parts.headers))
            .ok_or_else(AppError::not_authorized)?;

        let claims = state.as_ref().verify(&token)?;

        tracing::Span::current().record("user_id", claims.id.as_str());

        Ok(CurrentUser {
            id: claims.id,
            email: claims.email,
        })
    }
}
