// src/services/auth_service.rs
// DOCUMENTATION: Account registration, login and emailed token flows
// PURPOSE: Business rules between the auth handlers and the user/token repositories

use crate::config::Config;
use crate::db::{TokenRepository, UserRepository};
use crate::errors::AppError;
use crate::models::{
    AuthResponse, AuthToken, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenKind,
    User, UserResponse, UserRole,
};
use crate::services::{
    digest_token, generate_one_time_token, hash_password, issue_session_token, verify_password,
    Mailer,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct AuthService;

/// Lowercased, trimmed email used as the account key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accounts may only self-register as client or photographer
pub fn ensure_self_registrable(role: UserRole) -> Result<(), AppError> {
    match role {
        UserRole::Client | UserRole::Photographer => Ok(()),
        UserRole::Admin => Err(AppError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        )),
    }
}

/// Decide the outcome of a token lookup that already deleted the row.
/// A missing row (never issued, replaced, or already used) is invalid.
pub fn redeem_token(stored: Option<AuthToken>, now: DateTime<Utc>) -> Result<AuthToken, AppError> {
    let stored = stored.ok_or(AppError::InvalidToken)?;
    if stored.is_expired_at(now) {
        return Err(AppError::TokenExpired);
    }
    Ok(stored)
}

impl AuthService {
    /// Create an account and email a verification link
    pub async fn register(
        pool: &PgPool,
        config: &Config,
        mailer: &Mailer,
        req: RegisterRequest,
    ) -> Result<UserResponse, AppError> {
        ensure_self_registrable(req.role)?;

        let email = normalize_email(&req.email);
        let password_hash = hash_password(&req.password)?;
        let user =
            UserRepository::create_user(pool, req.name.trim(), &email, &password_hash, req.role)
                .await?;

        // The account exists either way; a failed email can be retried via resend-verification
        if let Err(e) = Self::send_verification(pool, config, mailer, &user).await {
            log::warn!("Verification email for user {} not sent: {}", user.id, e);
        }

        Ok(user.to_response())
    }

    /// Exchange credentials for a session token
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&req.email);

        let user = match UserRepository::find_by_email(pool, &email).await? {
            Some(user) => user,
            None => {
                // Keep response time close to the known-account path
                let _ = hash_password(&req.password);
                log::info!("Login attempt for unknown account");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(&req.password, &user.password_hash)? {
            log::info!("Failed login for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_verified() {
            return Err(AppError::EmailNotVerified);
        }

        let role = user.role().map_err(|e| {
            log::error!("User {} has a corrupt role: {}", user.id, e);
            AppError::InternalError
        })?;
        let (token, expires_in) = issue_session_token(user.id, role, config)?;

        log::info!("User {} logged in", user.id);
        Ok(AuthResponse {
            token,
            token_type: "Bearer",
            expires_in,
            user: user.to_response(),
        })
    }

    pub async fn verify_email(pool: &PgPool, token: &str) -> Result<(), AppError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start verification transaction: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        let stored = Self::consume_token(&mut *tx, token, TokenKind::EmailVerification).await;
        let stored = match stored {
            Ok(stored) => stored,
            Err(e) => {
                // An expired token was deleted on read; keep that deletion
                Self::commit(tx).await?;
                return Err(e);
            }
        };

        let updated = UserRepository::mark_email_verified(&mut *tx, &stored.email).await?;
        if updated == 0 {
            log::warn!("Verification token outlived its account");
            Self::commit(tx).await?;
            return Err(AppError::InvalidToken);
        }

        Self::commit(tx).await?;
        log::info!("Email verified for token issued {}", stored.created_at.to_rfc3339());
        Ok(())
    }

    /// Re-send the verification link. Silent when there is nothing to send.
    pub async fn resend_verification(
        pool: &PgPool,
        config: &Config,
        mailer: &Mailer,
        email: &str,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        match UserRepository::find_by_email(pool, &email).await? {
            Some(user) if !user.is_verified() => {
                Self::send_verification(pool, config, mailer, &user).await
            }
            Some(_) => {
                log::debug!("Verification requested for an already verified account");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Email a password reset link. Silent when the account does not exist.
    pub async fn forgot_password(
        pool: &PgPool,
        config: &Config,
        mailer: &Mailer,
        email: &str,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        let user = match UserRepository::find_by_email(pool, &email).await? {
            Some(user) => user,
            None => return Ok(()),
        };

        let (token, digest) = generate_one_time_token();
        let ttl = config.reset_token_ttl_minutes;
        let expires_at = Utc::now() + Duration::minutes(ttl);
        TokenRepository::replace_token(pool, &user.email, TokenKind::PasswordReset, &digest, expires_at)
            .await?;

        let message = mailer.password_reset_email(&user.email, &user.name, &token, ttl);
        mailer.send(&message).await
    }

    pub async fn reset_password(pool: &PgPool, req: ResetPasswordRequest) -> Result<(), AppError> {
        // Hash before the transaction so the token row is not held during Argon2
        let password_hash = hash_password(&req.password)?;

        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start password reset transaction: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        let stored = match Self::consume_token(&mut *tx, &req.token, TokenKind::PasswordReset).await {
            Ok(stored) => stored,
            Err(e) => {
                Self::commit(tx).await?;
                return Err(e);
            }
        };

        let updated = UserRepository::update_password(&mut *tx, &stored.email, &password_hash).await?;
        Self::commit(tx).await?;

        if updated == 0 {
            log::warn!("Password reset token outlived its account");
            return Err(AppError::InvalidToken);
        }

        log::info!("Password reset completed");
        Ok(())
    }

    pub async fn current_user(pool: &PgPool, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = UserRepository::get_by_id(pool, user_id).await?;
        Ok(user.to_response())
    }

    async fn send_verification(
        pool: &PgPool,
        config: &Config,
        mailer: &Mailer,
        user: &User,
    ) -> Result<(), AppError> {
        let (token, digest) = generate_one_time_token();
        let ttl = config.verification_token_ttl_hours;
        let expires_at = Utc::now() + Duration::hours(ttl);
        TokenRepository::replace_token(
            pool,
            &user.email,
            TokenKind::EmailVerification,
            &digest,
            expires_at,
        )
        .await?;

        let message = mailer.verification_email(&user.email, &user.name, &token, ttl);
        mailer.send(&message).await
    }

    /// Delete the token and hand it back if still valid
    async fn consume_token(
        conn: &mut PgConnection,
        token: &str,
        kind: TokenKind,
    ) -> Result<AuthToken, AppError> {
        let stored = TokenRepository::take_token(conn, &digest_token(token), kind).await?;

        redeem_token(stored, Utc::now()).map_err(|e| {
            log::info!("Rejected {} token: {}", kind.as_str(), e);
            e
        })
    }

    async fn commit(tx: sqlx::Transaction<'_, sqlx::Postgres>) -> Result<(), AppError> {
        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit auth transaction: {}", e);
            AppError::DatabaseError(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_token(expires_at: DateTime<Utc>) -> AuthToken {
        AuthToken {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            kind: TokenKind::EmailVerification.as_str().into(),
            token_hash: digest_token("token"),
            expires_at,
            created_at: expires_at - Duration::hours(24),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_only_client_and_photographer_can_register() {
        assert!(ensure_self_registrable(UserRole::Client).is_ok());
        assert!(ensure_self_registrable(UserRole::Photographer).is_ok());
        assert!(matches!(
            ensure_self_registrable(UserRole::Admin),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_live_token_is_redeemed() {
        let now = Utc::now();
        let token = tokio_test::assert_ok!(redeem_token(
            Some(stored_token(now + Duration::minutes(5))),
            now
        ));
        assert_eq!(token.email, "ada@example.com");
    }

    #[test]
    fn test_expired_token_then_retry() {
        let now = Utc::now();
        // First attempt finds the expired row (and deletes it)
        assert!(matches!(
            redeem_token(Some(stored_token(now - Duration::seconds(1))), now),
            Err(AppError::TokenExpired)
        ));
        // Retry finds nothing
        assert!(matches!(redeem_token(None, now), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_expiring_now_is_expired() {
        let now = Utc::now();
        assert!(matches!(
            redeem_token(Some(stored_token(now)), now),
            Err(AppError::TokenExpired)
        ));
    }
}
