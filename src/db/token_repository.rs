// src/db/token_repository.rs
// DOCUMENTATION: Email verification and password reset token storage
// PURPOSE: Issue (replacing prior tokens), consume once, purge expired

use crate::errors::AppError;
use crate::models::{AuthToken, TokenKind};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use super::db_error;

pub struct TokenRepository;

impl TokenRepository {
    /// Store a new token digest, deleting every earlier token of the same kind
    /// for this email in the same transaction
    pub async fn replace_token(
        pool: &PgPool,
        email: &str,
        kind: TokenKind,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthToken, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(db_error("Failed to start token transaction"))?;

        let removed = sqlx::query("DELETE FROM auth_tokens WHERE email = $1 AND kind = $2")
            .bind(email)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to invalidate previous tokens"))?
            .rows_affected();

        let token = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (email, kind, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(kind.as_str())
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to store token"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit token transaction"))?;

        log::info!(
            "Issued {} token (replaced {} earlier) expiring {}",
            kind.as_str(),
            removed,
            expires_at.to_rfc3339()
        );
        Ok(token)
    }

    /// Delete and return the token with this digest. Deleting on read makes
    /// every token single-use even under concurrent requests.
    pub async fn take_token(
        conn: &mut PgConnection,
        token_hash: &str,
        kind: TokenKind,
    ) -> Result<Option<AuthToken>, AppError> {
        sqlx::query_as::<_, AuthToken>(
            "DELETE FROM auth_tokens WHERE token_hash = $1 AND kind = $2 RETURNING *",
        )
        .bind(token_hash)
        .bind(kind.as_str())
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to consume token"))
    }

    /// Remove tokens that can no longer be used
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= NOW()")
            .execute(pool)
            .await
            .map_err(db_error("Failed to purge expired tokens"))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const EMAIL: &str = "ada@example.com";

    async fn issue(pool: &PgPool, hash: &str, expires_at: DateTime<Utc>) -> AuthToken {
        TokenRepository::replace_token(pool, EMAIL, TokenKind::PasswordReset, hash, expires_at)
            .await
            .unwrap()
    }

    async fn take(pool: &PgPool, hash: &str) -> Option<AuthToken> {
        let mut conn = pool.acquire().await.unwrap();
        TokenRepository::take_token(&mut *conn, hash, TokenKind::PasswordReset)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_token_is_single_use(pool: PgPool) {
        issue(&pool, "hash-a", Utc::now() + Duration::hours(1)).await;

        assert!(take(&pool, "hash-a").await.is_some());
        assert!(take(&pool, "hash-a").await.is_none());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_new_token_replaces_earlier_one(pool: PgPool) {
        issue(&pool, "hash-a", Utc::now() + Duration::hours(1)).await;
        issue(&pool, "hash-b", Utc::now() + Duration::hours(1)).await;

        assert!(take(&pool, "hash-a").await.is_none());
        assert!(take(&pool, "hash-b").await.is_some());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_expired_token_is_removed_on_read(pool: PgPool) {
        issue(&pool, "hash-a", Utc::now() - Duration::minutes(1)).await;

        let first = take(&pool, "hash-a").await.unwrap();
        assert!(first.is_expired_at(Utc::now()));
        assert!(take(&pool, "hash-a").await.is_none());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_purge_removes_only_expired(pool: PgPool) {
        TokenRepository::replace_token(
            &pool,
            "old@example.com",
            TokenKind::EmailVerification,
            "hash-old",
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();
        issue(&pool, "hash-live", Utc::now() + Duration::hours(1)).await;

        assert_eq!(TokenRepository::delete_expired(&pool).await.unwrap(), 1);
        assert!(take(&pool, "hash-live").await.is_some());
    }
}
