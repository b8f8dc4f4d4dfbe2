// src/handlers/photographers.rs
// DOCUMENTATION: HTTP handlers for photographer profiles
// PURPOSE: Parse requests, call services, return responses

use crate::errors::AppError;
use crate::handlers::extractors::AuthUser;
use crate::models::{
    AvailabilityQuery, CreatePhotographerRequest, PhotographerSearchQuery,
    UpdatePhotographerRequest,
};
use crate::services::PhotographerService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// GET /photographers/search
pub async fn search_photographers(
    pool: web::Data<PgPool>,
    query: web::Query<PhotographerSearchQuery>,
) -> Result<impl Responder, AppError> {
    let result = PhotographerService::search_photographers(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /photographers/{id}
/// Profile with packages and recent reviews
pub async fn get_photographer(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let detail = PhotographerService::get_photographer(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /photographers/{id}/packages
pub async fn list_packages(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let packages = PhotographerService::list_packages(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(packages))
}

/// GET /photographers/{id}/reviews
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let reviews = PhotographerService::list_reviews(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// GET /photographers/{id}/availability?from=&to=
pub async fn list_availability(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
) -> Result<impl Responder, AppError> {
    let slots = PhotographerService::list_availability(
        pool.get_ref(),
        path.into_inner(),
        query.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(slots))
}

/// POST /photographers/profile
pub async fn create_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePhotographerRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;

    let profile =
        PhotographerService::create_profile(pool.get_ref(), user.user_id, user.role, req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// PUT /photographers/profile
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdatePhotographerRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;

    let profile =
        PhotographerService::update_profile(pool.get_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Configuration for photographer routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/photographers")
            .route("/search", web::get().to(search_photographers))
            .route("/profile", web::post().to(create_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/{id}", web::get().to(get_photographer))
            .route("/{id}/packages", web::get().to(list_packages))
            .route("/{id}/reviews", web::get().to(list_reviews))
            .route("/{id}/availability", web::get().to(list_availability)),
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
    async fn test_create_profile_validates_before_touching_the_database() {
        let config = test_config();
        let (token, _) = issue_session_token(Uuid::new_v4(), UserRole::Photographer, &config).unwrap();
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
            .uri("/photographers/profile")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .set_json(json!({ "hourly_rate_cents": -100, "portfolio_url": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_profile_update_requires_token() {
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

        let req = test::TestRequest::put()
            .uri("/photographers/profile")
            .set_json(json!({ "bio": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
