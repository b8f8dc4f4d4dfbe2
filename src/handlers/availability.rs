// src/handlers/availability.rs
// DOCUMENTATION: HTTP handlers for a photographer's availability slots

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::models::CreateAvailabilityRequest;
use crate::services::AvailabilityService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /availability
pub async fn create_slot(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateAvailabilityRequest>,
) -> Result<impl Responder, AppError> {
    let slot = AvailabilityService::create_slot(pool.get_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(slot))
}

/// DELETE /availability/{id}
pub async fn delete_slot(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    AvailabilityService::delete_slot(pool.get_ref(), user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/availability")
            .route("", web::post().to(create_slot))
            .route("/{id}", web::delete().to(delete_slot)),
    );
}
