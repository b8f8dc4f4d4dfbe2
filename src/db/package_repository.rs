// src/db/package_repository.rs
// DOCUMENTATION: Package database operations
// PURPOSE: Handle CRUD operations for photographer packages

use crate::errors::AppError;
use crate::models::{CreatePackageRequest, Package, UpdatePackageRequest};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;

pub struct PackageRepository;

impl PackageRepository {
    pub async fn create_package(
        pool: &PgPool,
        photographer_id: Uuid,
        req: &CreatePackageRequest,
    ) -> Result<Package, AppError> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages (
                photographer_id, name, description, price_cents,
                duration_minutes, deliverables
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(photographer_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price_cents)
        .bind(req.duration_minutes)
        .bind(&req.deliverables)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create package: {}", e);
            AppError::DatabaseError(format!("Create package failed: {}", e))
        })?;

        log::info!("Created package {} for photographer {}", package.id, photographer_id);
        Ok(package)
    }

    /// Active package by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = $1 AND is_active = true")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch package"))?
            .ok_or_else(|| AppError::NotFound(format!("Package {}", id)))
    }

    /// Active packages of a photographer, cheapest first
    pub async fn get_packages_by_photographer(
        pool: &PgPool,
        photographer_id: Uuid,
    ) -> Result<Vec<Package>, AppError> {
        sqlx::query_as::<_, Package>(
            r#"
            SELECT * FROM packages
            WHERE photographer_id = $1 AND is_active = true
            ORDER BY price_cents ASC, created_at ASC
            "#,
        )
        .bind(photographer_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch packages for photographer {}: {}", photographer_id, e);
            AppError::DatabaseError(format!("Fetch packages failed: {}", e))
        })
    }

    /// Partial update - only provided fields are modified
    pub async fn update_package(
        pool: &PgPool,
        id: Uuid,
        req: &UpdatePackageRequest,
    ) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            r#"
            UPDATE packages
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                price_cents = COALESCE($3, price_cents),
                duration_minutes = COALESCE($4, duration_minutes),
                deliverables = COALESCE($5, deliverables),
                updated_at = NOW()
            WHERE id = $6 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price_cents)
        .bind(req.duration_minutes)
        .bind(&req.deliverables)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error("Failed to update package"))?
        .ok_or_else(|| AppError::NotFound(format!("Package {}", id)))
    }

    /// Soft delete: existing bookings keep their package reference
    pub async fn deactivate_package(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let rows = sqlx::query(
            "UPDATE packages SET is_active = false, updated_at = NOW() WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error("Failed to delete package"))?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Package {}", id)));
        }

        log::info!("Deleted package: {}", id);
        Ok(())
    }
}
