// src/services/mailer.rs
// DOCUMENTATION: Transactional email delivery over an HTTP JSON API
// PURPOSE: Send verification and password reset links; log them when no provider is configured

use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Plain-text email ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct SendEmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Email client
/// DOCUMENTATION: POSTs {from, to, subject, text} with a bearer key to EMAIL_API_URL
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
    app_base_url: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client for email: {}", e);
                Client::new()
            });

        Self {
            client,
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
            app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_url.is_empty()
    }

    pub fn verification_email(&self, to: &str, name: &str, token: &str, ttl_hours: i64) -> Email {
        let link = format!("{}/auth/verify-email?token={}", self.app_base_url, token);
        Email {
            to: to.to_string(),
            subject: "Verify your ShutterConnect email".to_string(),
            text: format!(
                "Hi {},\n\nConfirm your email address by opening this link:\n\n{}\n\n\
                 The link expires in {} hours. If you did not create an account, ignore this email.\n",
                name, link, ttl_hours
            ),
        }
    }

    pub fn password_reset_email(&self, to: &str, name: &str, token: &str, ttl_minutes: i64) -> Email {
        let link = format!("{}/auth/reset-password?token={}", self.app_base_url, token);
        Email {
            to: to.to_string(),
            subject: "Reset your ShutterConnect password".to_string(),
            text: format!(
                "Hi {},\n\nSomeone asked to reset your password. Choose a new one here:\n\n{}\n\n\
                 The link expires in {} minutes and can be used once. \
                 If you did not ask for this, ignore this email.\n",
                name, link, ttl_minutes
            ),
        }
    }

    /// Deliver an email. Without a configured provider the message is logged.
    pub async fn send(&self, email: &Email) -> Result<(), AppError> {
        if !self.is_enabled() {
            log::info!(
                "Email delivery disabled; would send '{}' to {}",
                email.subject,
                email.to
            );
            log::debug!("Email body:\n{}", email.text);
            return Ok(());
        }

        let payload = SendEmailPayload {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Email request failed: {}", e);
                AppError::ExternalApiError(format!("Email provider unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Email provider returned HTTP {}: {}", status, body);
            return Err(AppError::ExternalApiError(format!(
                "Email provider returned HTTP {}",
                status
            )));
        }

        log::info!("Sent '{}' to {}", email.subject, email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_verification_email_contains_link() {
        let mut config = test_config();
        config.app_base_url = "https://shutter.example/".to_string();
        let mailer = Mailer::new(&config);

        let email = mailer.verification_email("ada@example.com", "Ada", "abc123", 24);
        assert_eq!(email.to, "ada@example.com");
        assert!(email
            .text
            .contains("https://shutter.example/auth/verify-email?token=abc123"));
        assert!(email.text.contains("24 hours"));
    }

    #[test]
    fn test_reset_email_mentions_single_use() {
        let mailer = Mailer::new(&test_config());
        let email = mailer.password_reset_email("ada@example.com", "Ada", "tok", 60);
        assert!(email.text.contains("/auth/reset-password?token=tok"));
        assert!(email.text.contains("used once"));
    }

    #[tokio::test]
    async fn test_send_without_provider_is_a_no_op() {
        let mailer = Mailer::new(&test_config());
        assert!(!mailer.is_enabled());

        let email = mailer.verification_email("ada@example.com", "Ada", "tok", 24);
        tokio_test::assert_ok!(mailer.send(&email).await);
    }
}
