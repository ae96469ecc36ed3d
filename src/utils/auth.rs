use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
    pub jti: String,
}

/// Authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingCredential,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error("token has expired")]
    Expired,

    #[error("token is invalid: {0}")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),

    #[error("token subject is not a user id")]
    InvalidSubject,

    #[error("couldn't sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

pub fn create_jwt(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let expiration = (Utc::now() + ttl).timestamp().max(0);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(AuthError::Signing)
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidCredential(e),
    })?;

    Ok(token_data.claims)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

/// Resolve request credentials to the calling user.
pub fn resolve_principal(headers: &HeaderMap, secret: &str) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_jwt(token, secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;
    Ok(Principal { user_id })
}
