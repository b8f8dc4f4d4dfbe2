// src/handlers/extractors.rs
// DOCUMENTATION: Request extractors shared by handlers
// PURPOSE: Authenticate the caller from an `Authorization: Bearer <jwt>` header

use crate::config::Config;
use crate::errors::AppError;
use crate::models::UserRole;
use crate::services::validate_session_token;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

/// Authenticated caller
/// DOCUMENTATION: Add as a handler argument to require a valid session token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    fn from_request_sync(req: &HttpRequest) -> Result<Self, AppError> {
        let config = req.app_data::<web::Data<Config>>().ok_or_else(|| {
            log::error!("Config missing from app data");
            AppError::InternalError
        })?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let claims = validate_session_token(token, config.get_ref())?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role()?,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}

/// Client IP used as the rate limiting key.
/// Taken from the socket; `Forwarded`/`X-Forwarded-For` are client controlled.
pub fn client_ip(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::services::issue_session_token;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let result = AuthUser::extract(&req).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[actix_rt::test]
    async fn test_wrong_scheme_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(test_config()))
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();

        assert!(AuthUser::extract(&req).await.is_err());
    }

    #[actix_rt::test]
    async fn test_valid_token_yields_caller() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let (token, _) = issue_session_token(user_id, UserRole::Client, &config).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(config))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, UserRole::Client);
    }

    #[test]
    fn test_client_ip_ignores_forwarded_headers() {
        let req = TestRequest::default()
            .peer_addr("10.1.1.1:5000".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .insert_header((header::FORWARDED, "for=203.0.113.8"))
            .to_http_request();
        assert_eq!(client_ip(&req), "10.1.1.1");

        let other_port = TestRequest::default()
            .peer_addr("10.1.1.1:6000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&other_port), "10.1.1.1");
    }
}
