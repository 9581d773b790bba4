use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Session claims issued by the identity provider. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims for a development token valid for `expiry_hours`
    pub fn new(sub: Uuid, email: Option<String>, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.dev_token_expiry_hours as i64)).timestamp();

        Self {
            sub,
            aud: security.jwt_audience.clone(),
            email,
            role: Some("authenticated".to_string()),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature, expiry and (when configured) audience
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    match security.jwt_audience.as_deref() {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(secret: &str, aud: Option<&str>) -> SecurityConfig {
        SecurityConfig {
            enable_cors: false,
            cors_origins: vec![],
            jwt_secret: secret.to_string(),
            jwt_audience: aud.map(str::to_string),
            dev_token_expiry_hours: 1,
        }
    }

    #[test]
    fn issued_tokens_validate() {
        let sec = security("test-secret", Some("authenticated"));
        let user = Uuid::new_v4();
        let token = generate_jwt(&Claims::new(user, None, &sec), &sec).unwrap();
        let claims = validate_jwt(&token, &sec).unwrap();
        assert_eq!(claims.sub, user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let sec = security("one", None);
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), None, &sec), &sec).unwrap();
        assert!(matches!(
            validate_jwt(&token, &security("two", None)),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn audience_mismatch_is_rejected() {
        let issuer = security("s", Some("other-app"));
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), None, &issuer), &issuer).unwrap();
        assert!(validate_jwt(&token, &security("s", Some("authenticated"))).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let sec = security("s", None);
        let mut claims = Claims::new(Uuid::new_v4(), None, &sec);
        claims.exp = Utc::now().timestamp() - 3600;
        claims.iat = claims.exp - 60;
        let token = generate_jwt(&claims, &sec).unwrap();
        assert!(validate_jwt(&token, &sec).is_err());
    }

    #[test]
    fn empty_secret_cannot_sign() {
        let sec = security("", None);
        let claims = Claims::new(Uuid::new_v4(), None, &sec);
        assert!(matches!(generate_jwt(&claims, &sec), Err(JwtError::InvalidSecret)));
    }
}
