// src/db/booking_repository.rs
// DOCUMENTATION: Booking database operations
// PURPOSE: Calendar reads for the conflict check, inserts, status updates, listings

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NewBooking, PaymentStatus};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::db_error;

pub struct BookingRepository;

impl BookingRepository {
    /// Active bookings of a photographer on one date
    /// DOCUMENTATION: Run inside the transaction holding the photographer lock
    pub async fn active_on_date(
        conn: &mut PgConnection,
        photographer_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE photographer_id = $1 AND date = $2 AND status = ANY($3)
            ORDER BY start_time COLLATE "C" ASC
            "#,
        )
        .bind(photographer_id)
        .bind(date)
        .bind(BookingStatus::active_strs())
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to load active bookings"))
    }

    pub async fn insert_booking(
        conn: &mut PgConnection,
        booking: &NewBooking,
    ) -> Result<Booking, AppError> {
        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                client_id, photographer_id, package_id, date,
                start_time, end_time, location, notes,
                status, payment_status, total_price_cents
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(booking.client_id) // $1
        .bind(booking.photographer_id) // $2
        .bind(booking.package_id) // $3
        .bind(booking.date) // $4
        .bind(booking.range.start.to_string()) // $5
        .bind(booking.range.end.to_string()) // $6
        .bind(&booking.location) // $7
        .bind(&booking.notes) // $8
        .bind(BookingStatus::Pending.as_str()) // $9
        .bind(PaymentStatus::Unpaid.as_str()) // $10
        .bind(booking.total_price_cents) // $11
        .fetch_one(conn)
        .await
        .map_err(|e| {
            log::error!("Failed to create booking: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Created booking {} for photographer {} on {} {}",
            created.id,
            created.photographer_id,
            created.date,
            booking.range
        );
        Ok(created)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch booking"))?
            .ok_or_else(|| {
                log::warn!("Booking not found: {}", id);
                AppError::NotFound(format!("Booking {}", id))
            })
    }

    /// Row-lock a booking for a status or payment change
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to lock booking"))?
            .ok_or_else(|| AppError::NotFound(format!("Booking {}", id)))
    }

    /// Bookings where the user is the client, or the photographer when they own a profile
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        photographer_id: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE (client_id = $1 OR photographer_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY date DESC, start_time COLLATE "C" DESC
            "#,
        )
        .bind(user_id)
        .bind(photographer_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list bookings for user {}: {}", user_id, e);
            AppError::DatabaseError(e.to_string())
        })
    }

    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<Booking, AppError> {
        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, payment_status = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status.as_str())
        .bind(payment_status.as_str())
        .bind(id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            log::error!("Status update failed for booking {}: {}", id, e);
            AppError::DatabaseError(e.to_string())
        })?;

        log::info!("Booking {} is now {} ({})", id, status, payment_status.as_str());
        Ok(updated)
    }

    /// Value of active bookings that have not been paid yet
    pub async fn unpaid_active_total(pool: &PgPool, photographer_id: Uuid) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_price_cents), 0)::bigint
            FROM bookings
            WHERE photographer_id = $1 AND status = ANY($2) AND payment_status = $3
            "#,
        )
        .bind(photographer_id)
        .bind(BookingStatus::active_strs())
        .bind(PaymentStatus::Unpaid.as_str())
        .fetch_one(pool)
        .await
        .map_err(db_error("Failed to total unpaid bookings"))?;

        Ok(total)
    }
}
