// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for account and session operations
// PURPOSE: Parse requests, apply rate limits, call the auth service

use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::extractors::{client_ip, AuthUser};
use crate::models::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenRequest,
};
use crate::services::{AuthRateLimiter, AuthService, Mailer};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// POST /auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    limiter: web::Data<AuthRateLimiter>,
    http: HttpRequest,
    req: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(&client_ip(&http))?;
    req.validate()?;

    let user = AuthService::register(pool.get_ref(), &config, &mailer, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<AuthRateLimiter>,
    http: HttpRequest,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(&client_ip(&http))?;
    req.validate()?;

    let session = AuthService::login(pool.get_ref(), &config, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// POST /auth/verify-email
pub async fn verify_email(
    pool: web::Data<PgPool>,
    req: web::Json<TokenRequest>,
) -> Result<impl Responder, AppError> {
    req.validate()?;
    AuthService::verify_email(pool.get_ref(), &req.token).await?;
    Ok(HttpResponse::Ok().json(json!({ "verified": true })))
}

/// POST /auth/resend-verification
/// Always 202 so the response does not reveal whether the account exists
pub async fn resend_verification(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    limiter: web::Data<AuthRateLimiter>,
    http: HttpRequest,
    req: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(&client_ip(&http))?;
    req.validate()?;

    if let Err(e) =
        AuthService::resend_verification(pool.get_ref(), &config, &mailer, &req.email).await
    {
        log::warn!("Resend verification failed: {}", e);
    }
    Ok(accepted())
}

/// POST /auth/forgot-password
/// Always 202 so the response does not reveal whether the account exists
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<Mailer>,
    limiter: web::Data<AuthRateLimiter>,
    http: HttpRequest,
    req: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(&client_ip(&http))?;
    req.validate()?;

    if let Err(e) = AuthService::forgot_password(pool.get_ref(), &config, &mailer, &req.email).await
    {
        log::warn!("Password reset request failed: {}", e);
    }
    Ok(accepted())
}

/// POST /auth/reset-password
pub async fn reset_password(
    pool: web::Data<PgPool>,
    limiter: web::Data<AuthRateLimiter>,
    http: HttpRequest,
    req: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(&client_ip(&http))?;
    req.validate()?;

    AuthService::reset_password(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "reset": true })))
}

/// GET /auth/me
pub async fn me(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, AppError> {
    let user = AuthService::current_user(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

fn accepted() -> HttpResponse {
    HttpResponse::Accepted().json(json!({
        "message": "If the account exists, an email is on its way"
    }))
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/verify-email", web::post().to(verify_email))
            .route("/resend-verification", web::post().to(resend_verification))
            .route("/forgot-password", web::post().to(forgot_password))
            .route("/reset-password", web::post().to(reset_password))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }

    macro_rules! auth_app {
        ($limiter:expr) => {{
            let config = test_config();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(lazy_pool()))
                    .app_data(web::Data::new(Mailer::new(&config)))
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new($limiter))
                    .configure(super::config),
            )
            .await
        }};
    }

    #[actix_rt::test]
    async fn test_register_rejects_invalid_fields() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "name": "Ada",
                "email": "not-an-email",
                "password": "short",
                "role": "client"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["fields"]["email"].is_array());
        assert!(body["error"]["fields"]["password"].is_array());
    }

    #[actix_rt::test]
    async fn test_login_is_rate_limited() {
        let app = auth_app!(AuthRateLimiter::per_minute(1));
        let body = json!({ "email": "bad", "password": "" });

        let first = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.1.1.1:5000".parse().unwrap())
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let second = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.1.1.1:5000".parse().unwrap())
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_rt::test]
    async fn test_rotating_forwarded_for_does_not_reset_limit() {
        let app = auth_app!(AuthRateLimiter::per_minute(1));
        let body = json!({ "email": "bad", "password": "" });

        let mut statuses = Vec::new();
        for i in 0..5 {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .peer_addr("10.1.1.1:5000".parse().unwrap())
                .insert_header(("x-forwarded-for", format!("203.0.113.{}", i)))
                .set_json(&body)
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }

        assert_eq!(statuses[0], StatusCode::BAD_REQUEST);
        assert!(statuses[1..]
            .iter()
            .all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
    }

    #[actix_rt::test]
    async fn test_me_requires_token() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
