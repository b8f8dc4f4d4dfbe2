// src/handlers/notifications.rs
// DOCUMENTATION: HTTP handlers for the caller's notifications

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::models::NotificationQuery;
use crate::services::NotificationService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// GET /notifications?unread_only=
pub async fn list_notifications(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<NotificationQuery>,
) -> Result<impl Responder, AppError> {
    let notifications =
        NotificationService::list(pool.get_ref(), user.user_id, query.unread_only).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

/// PATCH /notifications/{id}/read
pub async fn mark_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let notification =
        NotificationService::mark_read(pool.get_ref(), path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(notification))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let updated = NotificationService::mark_all_read(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/read-all", web::post().to(mark_all_read))
            .route("/{id}/read", web::patch().to(mark_read)),
    );
}
