// src/services/package_service.rs
// DOCUMENTATION: Package management for the owning photographer

use crate::db::PackageRepository;
use crate::errors::AppError;
use crate::models::{CreatePackageRequest, Package, PackageResponse, UpdatePackageRequest};
use crate::services::PhotographerService;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PackageService;

impl PackageService {
    pub async fn create_package(
        pool: &PgPool,
        user_id: Uuid,
        req: CreatePackageRequest,
    ) -> Result<PackageResponse, AppError> {
        let own = PhotographerService::own_profile(pool, user_id).await?;
        let package = PackageRepository::create_package(pool, own.id, &req).await?;
        Ok(package.to_response())
    }

    pub async fn update_package(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdatePackageRequest,
    ) -> Result<PackageResponse, AppError> {
        Self::owned_package(pool, user_id, id).await?;
        let package = PackageRepository::update_package(pool, id, &req).await?;
        Ok(package.to_response())
    }

    /// Soft delete; bookings made with the package keep pointing at it
    pub async fn delete_package(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        Self::owned_package(pool, user_id, id).await?;
        PackageRepository::deactivate_package(pool, id).await
    }

    async fn owned_package(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Package, AppError> {
        let own = PhotographerService::own_profile(pool, user_id).await?;
        let package = PackageRepository::get_by_id(pool, id).await?;

        if package.photographer_id != own.id {
            log::warn!("User {} tried to modify package {} they do not own", user_id, id);
            return Err(AppError::Forbidden("You do not own this package".to_string()));
        }
        Ok(package)
    }
}
