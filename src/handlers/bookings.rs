// src/handlers/bookings.rs
// DOCUMENTATION: HTTP handlers for bookings and their payments and reviews
// PURPOSE: Parse requests, call the booking service, return responses

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::models::{
    BookingQuery, CreateBookingRequest, CreatePaymentRequest, CreateReviewRequest,
    UpdateBookingStatusRequest,
};
use crate::services::BookingService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// POST /bookings
/// Book a photographer; 400 BOOKING_CONFLICT when the time range is taken
pub async fn create_booking(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateBookingRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    let booking = BookingService::create_booking(pool.get_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// GET /bookings?status=
pub async fn list_bookings(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<BookingQuery>,
) -> Result<impl Responder, AppError> {
    let bookings = BookingService::list_bookings(pool.get_ref(), user.user_id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /bookings/{id}
pub async fn get_booking(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let booking =
        BookingService::get_booking(pool.get_ref(), path.into_inner(), user.user_id, user.role).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// PATCH /bookings/{id}/status
pub async fn update_status(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateBookingStatusRequest>,
) -> Result<impl Responder, AppError> {
    let booking = BookingService::update_status(
        pool.get_ref(),
        path.into_inner(),
        user.user_id,
        user.role,
        req.status,
    )
    .await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// POST /bookings/{id}/payments
pub async fn pay_booking(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreatePaymentRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    let payment =
        BookingService::pay_booking(pool.get_ref(), path.into_inner(), user.user_id, req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(payment))
}

/// POST /bookings/{id}/review
pub async fn review_booking(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    let review =
        BookingService::review_booking(pool.get_ref(), path.into_inner(), user.user_id, req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(review))
}

/// Configuration for booking routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/status", web::patch().to(update_status))
            .route("/{id}/payments", web::post().to(pay_booking))
            .route("/{id}/review", web::post().to(review_booking)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::models::UserRole;
    use crate::services::issue_session_token;
    use actix_web::{http::header, http::StatusCode, test, App};
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    #[actix_rt::test]
    async fn test_booking_requires_token() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(test_config()))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/bookings").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_review_rating_out_of_range_is_rejected() {
        let config = test_config();
        let (token, _) = issue_session_token(Uuid::new_v4(), UserRole::Client, &config).unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/bookings/{}/review", Uuid::new_v4()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .set_json(json!({ "rating": 6 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"]["fields"]["rating"].is_array());
    }
}
