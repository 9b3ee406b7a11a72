use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tubely_api::auth::{JwtClaims, TOKEN_ISSUER};
use uuid::Uuid;

/// Secret shared by the test config and the tokens minted here.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Access token for `user_id`, valid for an hour.
pub fn token_for(user_id: Uuid) -> String {
    sign(user_id, TEST_JWT_SECRET, 3600)
}

pub fn sign(user_id: Uuid, secret: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}
