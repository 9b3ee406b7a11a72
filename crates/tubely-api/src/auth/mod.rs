//! Bearer token authentication

pub mod jwt;

pub use jwt::{bearer_token, JwtClaims, JwtValidator, TOKEN_ISSUER};
