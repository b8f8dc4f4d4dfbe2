// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Insert one review per booking and list a photographer's reviews

use crate::errors::AppError;
use crate::models::{Booking, CreateReviewRequest, Review};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::is_unique_violation;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Create the review for a booking
    /// DOCUMENTATION: reviews.booking_id is unique; a second review maps to AlreadyExists
    pub async fn create_review(
        conn: &mut PgConnection,
        booking: &Booking,
        req: &CreateReviewRequest,
    ) -> Result<Review, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (booking_id, client_id, photographer_id, rating, comment)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT i.id, i.booking_id, i.client_id, i.photographer_id,
                   u.name AS client_name, i.rating, i.comment, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.client_id
            "#,
        )
        .bind(booking.id)
        .bind(booking.client_id)
        .bind(booking.photographer_id)
        .bind(req.rating)
        .bind(&req.comment)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::AlreadyExists(format!("Booking {} already has a review", booking.id));
            }
            log::error!("Failed to create review: {}", e);
            AppError::DatabaseError(format!("Create review failed: {}", e))
        })?;

        Ok(review)
    }

    /// Most recent reviews for a photographer
    pub async fn get_reviews_by_photographer(
        pool: &PgPool,
        photographer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.booking_id, r.client_id, r.photographer_id,
                   u.name AS client_name, r.rating, r.comment, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.client_id
            WHERE r.photographer_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(photographer_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for photographer {}: {}", photographer_id, e);
            AppError::DatabaseError(format!("Fetch reviews failed: {}", e))
        })?;

        Ok(reviews)
    }
}
