//! JWT token service

use std::sync::LazyLock;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;

use crate::model::JwtPayload;

/// Decoded tokens, so a token is verified once per TTL rather than per request
static TOKEN_CACHE: LazyLock<Cache<String, JwtPayload>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

/// Decode and validate JWT token with caching
pub fn decode_jwt_token_cached(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<JwtPayload> {
    if let Some(cached) = TOKEN_CACHE.get(token) {
        if cached.exp > chrono::Utc::now().timestamp() {
            return Ok(cached);
        }
        TOKEN_CACHE.invalidate(token);
    }

    let claims = decode_jwt_token(token, secret_key)?;
    TOKEN_CACHE.insert(token.to_string(), claims.clone());

    Ok(claims)
}

/// Decode and validate JWT token without caching
pub fn decode_jwt_token(token: &str, secret_key: &str) -> jsonwebtoken::errors::Result<JwtPayload> {
    let decoding_key = DecodingKey::from_base64_secret(secret_key)?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    Ok(decode::<JwtPayload>(token, &decoding_key, &validation)?.claims)
}

/// Encode a JWT token for a user
pub fn encode_jwt_token(
    user_id: i64,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let payload = JwtPayload { user_id, exp };

    let encoding_key = EncodingKey::from_base64_secret(secret_key)?;
    encode(&Header::new(Algorithm::HS256), &payload, &encoding_key)
}
