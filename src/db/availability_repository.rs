// src/db/availability_repository.rs
// DOCUMENTATION: Availability slot database operations
// PURPOSE: Declare, list and delete slots; flip is_booked as bookings come and go

use crate::errors::AppError;
use crate::models::{AvailabilitySlot, BookingStatus, TimeRange};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::db_error;

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    pub async fn create_slot(
        conn: &mut PgConnection,
        photographer_id: Uuid,
        date: NaiveDate,
        range: &TimeRange,
    ) -> Result<AvailabilitySlot, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            INSERT INTO availability (photographer_id, date, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(photographer_id)
        .bind(date)
        .bind(range.start.to_string())
        .bind(range.end.to_string())
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create availability slot"))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<AvailabilitySlot, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>("SELECT * FROM availability WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch availability slot"))?
            .ok_or_else(|| AppError::NotFound(format!("Availability slot {}", id)))
    }

    /// Slots in an inclusive date window, chronological
    pub async fn list_between(
        pool: &PgPool,
        photographer_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            SELECT * FROM availability
            WHERE photographer_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC, start_time COLLATE "C" ASC
            "#,
        )
        .bind(photographer_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(db_error("Failed to list availability"))
    }

    pub async fn list_for_date(
        conn: &mut PgConnection,
        photographer_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            "SELECT * FROM availability WHERE photographer_id = $1 AND date = $2",
        )
        .bind(photographer_id)
        .bind(date)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list availability for date"))
    }

    /// Delete an unbooked slot. Returns false when the slot is booked.
    pub async fn delete_unbooked(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let rows = sqlx::query("DELETE FROM availability WHERE id = $1 AND is_booked = false")
            .bind(id)
            .execute(pool)
            .await
            .map_err(db_error("Failed to delete availability slot"))?
            .rows_affected();

        Ok(rows > 0)
    }

    /// Mark every slot overlapping `range` on `date` as booked
    pub async fn mark_booked(
        conn: &mut PgConnection,
        photographer_id: Uuid,
        date: NaiveDate,
        range: &TimeRange,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE availability
            SET is_booked = true
            WHERE photographer_id = $1
              AND date = $2
              AND start_time COLLATE "C" < $4
              AND $3 < end_time COLLATE "C"
            "#,
        )
        .bind(photographer_id)
        .bind(date)
        .bind(range.start.to_string())
        .bind(range.end.to_string())
        .execute(conn)
        .await
        .map_err(db_error("Failed to mark availability booked"))?;

        Ok(result.rows_affected())
    }

    /// Free the slots a cancelled booking covered, unless another active
    /// booking still overlaps them
    pub async fn release(
        conn: &mut PgConnection,
        booking_id: Uuid,
        photographer_id: Uuid,
        date: NaiveDate,
        range: &TimeRange,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE availability a
            SET is_booked = false
            WHERE a.photographer_id = $1
              AND a.date = $2
              AND a.is_booked = true
              AND a.start_time COLLATE "C" < $4
              AND $3 < a.end_time COLLATE "C"
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.photographer_id = a.photographer_id
                    AND b.date = a.date
                    AND b.id <> $5
                    AND b.status = ANY($6)
                    AND b.start_time COLLATE "C" < a.end_time COLLATE "C"
                    AND a.start_time COLLATE "C" < b.end_time COLLATE "C"
              )
            "#,
        )
        .bind(photographer_id)
        .bind(date)
        .bind(range.start.to_string())
        .bind(range.end.to_string())
        .bind(booking_id)
        .bind(BookingStatus::active_strs())
        .execute(conn)
        .await
        .map_err(db_error("Failed to release availability"))?;

        Ok(result.rows_affected())
    }
}
