// src/services/tokens.rs
// DOCUMENTATION: Session tokens (HS256 JWT) and emailed one-time tokens
// PURPOSE: Session issue/validation; one-time token generation and digesting

use crate::config::Config;
use crate::errors::AppError;
use crate::models::UserRole;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims carried by every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Role name at issue time
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.role.parse().map_err(|_| AppError::Unauthorized)
    }
}

/// Issue a session token. Returns (token, lifetime in seconds).
pub fn issue_session_token(
    user_id: Uuid,
    role: UserRole,
    config: &Config,
) -> Result<(String, i64), AppError> {
    let now = Utc::now().timestamp();
    let lifetime = config.jwt_expiration_hours * 3600;

    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        exp: now + lifetime,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign session token: {}", e);
        AppError::InternalError
    })?;

    Ok((token, lifetime))
}

/// Validate signature and expiry of a session token
pub fn validate_session_token(token: &str, config: &Config) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Rejected session token: {}", e);
        AppError::Unauthorized
    })
}

/// Generate an emailed one-time token: (plaintext for the link, digest to store)
pub fn generate_one_time_token() -> (String, String) {
    let plaintext = Uuid::new_v4().simple().to_string();
    let digest = digest_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a one-time token
pub fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_session_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let (token, lifetime) = issue_session_token(user_id, UserRole::Photographer, &config).unwrap();
        assert_eq!(lifetime, 3600);

        let claims = validate_session_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role().unwrap(), UserRole::Photographer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_session_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "client".into(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_session_token(&token, &config),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_secret = "a-completely-different-signing-secret".into();

        let (token, _) = issue_session_token(Uuid::new_v4(), UserRole::Client, &other).unwrap();
        assert!(validate_session_token(&token, &config).is_err());
    }

    #[test]
    fn test_one_time_tokens_are_unique_and_digested() {
        let (a, digest_a) = generate_one_time_token();
        let (b, _) = generate_one_time_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert_eq!(digest_a.len(), 64);
        assert_eq!(digest_token(&a), digest_a);
        assert_eq!(digest_token(&format!(" {} ", a)), digest_a);
    }
}
