// src/db/user_repository.rs
// DOCUMENTATION: User account database operations
// PURPOSE: Registration, lookup, verification and password updates

use crate::errors::AppError;
use crate::models::{User, UserRole};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{db_error, is_unique_violation};

pub struct UserRepository;

impl UserRepository {
    /// Insert a new account
    /// DOCUMENTATION: Email must already be normalized; duplicate email maps to AlreadyExists
    pub async fn create_user(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::AlreadyExists(format!("An account for {} already exists", email));
            }
            log::error!("Failed to create user: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        log::info!("Created {} account: {}", user.role, user.id);
        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to look up user by email"))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch user"))?
            .ok_or_else(|| {
                log::warn!("User not found: {}", id);
                AppError::NotFound(format!("User {}", id))
            })
    }

    /// Set email_verified_at if not already set. Returns rows affected.
    pub async fn mark_email_verified(conn: &mut PgConnection, email: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email_verified_at = COALESCE(email_verified_at, NOW()),
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(conn)
        .await
        .map_err(db_error("Failed to mark email verified"))?;

        Ok(result.rows_affected())
    }

    /// Replace the password hash. A successful reset also proves the mailbox, so
    /// an unverified account becomes verified.
    pub async fn update_password(
        conn: &mut PgConnection,
        email: &str,
        password_hash: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1,
                email_verified_at = COALESCE(email_verified_at, NOW()),
                updated_at = NOW()
            WHERE email = $2
            "#,
        )
        .bind(password_hash)
        .bind(email)
        .execute(conn)
        .await
        .map_err(db_error("Failed to update password"))?;

        Ok(result.rows_affected())
    }
}
