// src/models/payment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Payment recorded against a booking
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub client_id: Uuid,
    pub photographer_id: Uuid,
    pub amount_cents: i64,
    /// completed | refunded
    pub status: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const PAYMENT_COMPLETED: &str = "completed";
pub const PAYMENT_REFUNDED: &str = "refunded";

/// POST /bookings/{id}/payments
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    /// e.g. "card", "bank_transfer", "cash"
    #[validate(length(min = 1, max = 50))]
    pub method: String,
}

/// Earnings for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlyEarnings {
    /// "YYYY-MM"
    pub month: String,
    pub amount_cents: i64,
    pub payments: i64,
}

/// GET /payments/summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub total_earned_cents: i64,
    pub refunded_cents: i64,
    /// Value of active bookings not yet paid
    pub pending_cents: i64,
    pub completed_payments: i64,
    pub monthly: Vec<MonthlyEarnings>,
}
