// src/handlers/payments.rs
// DOCUMENTATION: HTTP handlers for payment history and earnings

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::services::PaymentService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /payments
pub async fn list_payments(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let payments = PaymentService::list_payments(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(payments))
}

/// GET /payments/summary
/// Earnings overview for the caller's photographer profile
pub async fn payment_summary(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let summary = PaymentService::summary(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("/summary", web::get().to(payment_summary)),
    );
}
