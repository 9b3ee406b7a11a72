//! HS256 access tokens
//!
//! Tokens are issued elsewhere; this service only validates them. The subject
//! claim carries the user's UUID.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

/// Issuer every accepted access token must carry.
pub const TOKEN_ISSUER: &str = "tubely-access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Validates access tokens against the shared secret.
#[derive(Clone)]
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate `token` and return the user it was issued to.
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthenticated("Couldn't validate JWT".to_string())
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthenticated("Couldn't validate JWT".to_string()))
    }

    /// Resolve the user behind the request's `Authorization` header.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AppError> {
        let token = bearer_token(headers)?;
        self.validate(token)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Couldn't find JWT".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Couldn't find JWT".to_string()))?;

    Ok(token)
}
