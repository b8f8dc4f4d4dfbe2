// src/handlers/packages.rs
// DOCUMENTATION: HTTP handlers for a photographer's own packages

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::models::{CreatePackageRequest, UpdatePackageRequest};
use crate::services::PackageService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// POST /packages
pub async fn create_package(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePackageRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    let package = PackageService::create_package(pool.get_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(package))
}

/// PUT /packages/{id}
pub async fn update_package(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePackageRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    let package = PackageService::update_package(
        pool.get_ref(),
        user.user_id,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(package))
}

/// DELETE /packages/{id}
/// Soft delete
pub async fn delete_package(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    PackageService::delete_package(pool.get_ref(), user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/packages")
            .route("", web::post().to(create_package))
            .route("/{id}", web::put().to(update_package))
            .route("/{id}", web::delete().to(delete_package)),
    );
}
