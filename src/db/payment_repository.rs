// src/db/payment_repository.rs
// DOCUMENTATION: Payment record database operations
// PURPOSE: Record and refund payments, aggregate earnings for summaries

use crate::errors::AppError;
use crate::models::{Booking, MonthlyEarnings, Payment, PAYMENT_COMPLETED, PAYMENT_REFUNDED};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::db_error;

pub struct PaymentRepository;

impl PaymentRepository {
    /// Record a completed payment for the full booking price
    pub async fn record_payment(
        conn: &mut PgConnection,
        booking: &Booking,
        method: &str,
    ) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (booking_id, client_id, photographer_id, amount_cents, status, method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.client_id)
        .bind(booking.photographer_id)
        .bind(booking.total_price_cents)
        .bind(PAYMENT_COMPLETED)
        .bind(method)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            log::error!("Failed to record payment for booking {}: {}", booking.id, e);
            AppError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Recorded payment {} of {} cents for booking {}",
            payment.id,
            payment.amount_cents,
            booking.id
        );
        Ok(payment)
    }

    pub async fn refund_for_booking(conn: &mut PgConnection, booking_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE payments SET status = $1, updated_at = NOW() WHERE booking_id = $2 AND status = $3",
        )
        .bind(PAYMENT_REFUNDED)
        .bind(booking_id)
        .bind(PAYMENT_COMPLETED)
        .execute(conn)
        .await
        .map_err(db_error("Failed to refund payments"))?;

        Ok(result.rows_affected())
    }

    /// Payments the user made, or received through their photographer profile
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        photographer_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE client_id = $1 OR photographer_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(photographer_id)
        .fetch_all(pool)
        .await
        .map_err(db_error("Failed to list payments"))
    }

    /// (earned, refunded, completed count) for a photographer
    pub async fn totals(pool: &PgPool, photographer_id: Uuid) -> Result<(i64, i64, i64), AppError> {
        sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COALESCE(SUM(amount_cents) FILTER (WHERE status = $2), 0)::bigint,
                COALESCE(SUM(amount_cents) FILTER (WHERE status = $3), 0)::bigint,
                COUNT(*) FILTER (WHERE status = $2)
            FROM payments
            WHERE photographer_id = $1
            "#,
        )
        .bind(photographer_id)
        .bind(PAYMENT_COMPLETED)
        .bind(PAYMENT_REFUNDED)
        .fetch_one(pool)
        .await
        .map_err(db_error("Failed to total payments"))
    }

    /// Completed earnings grouped by calendar month since `since`
    pub async fn monthly_earnings(
        pool: &PgPool,
        photographer_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyEarnings>, AppError> {
        sqlx::query_as::<_, MonthlyEarnings>(
            r#"
            SELECT
                to_char(date_trunc('month', created_at AT TIME ZONE 'UTC'), 'YYYY-MM') AS month,
                SUM(amount_cents)::bigint AS amount_cents,
                COUNT(*) AS payments
            FROM payments
            WHERE photographer_id = $1 AND status = $2 AND created_at >= $3
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(photographer_id)
        .bind(PAYMENT_COMPLETED)
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(db_error("Failed to aggregate monthly earnings"))
    }
}
