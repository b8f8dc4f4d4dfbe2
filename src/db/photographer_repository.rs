// src/db/photographer_repository.rs
// DOCUMENTATION: Database access layer for photographer profiles
// PURPOSE: Profile CRUD, filtered search, booking row locks and rating aggregation

use crate::errors::AppError;
use crate::models::{
    CreatePhotographerRequest, Photographer, PhotographerSearchQuery, UpdatePhotographerRequest,
};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{contains_pattern, db_error, is_unique_violation};

/// Profile columns plus the owning user's display fields
const SELECT_PHOTOGRAPHER: &str = r#"
    SELECT
        p.id, p.user_id, u.name, u.image_url,
        p.bio, p.location, p.specialties, p.hourly_rate_cents,
        p.experience_years, p.portfolio_url, p.rating, p.review_count,
        p.is_available, p.created_at, p.updated_at
    FROM photographers p
    JOIN users u ON u.id = p.user_id
"#;

/// PhotographerRepository: All database operations for photographer profiles
pub struct PhotographerRepository;

impl PhotographerRepository {
    /// Create the profile for a photographer account
    /// DOCUMENTATION: One profile per user; a second attempt maps to AlreadyExists
    pub async fn create_photographer(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreatePhotographerRequest,
    ) -> Result<Photographer, AppError> {
        let inserted: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO photographers (
                user_id, bio, location, specialties,
                hourly_rate_cents, experience_years, portfolio_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&req.bio)
        .bind(&req.location)
        .bind(&req.specialties)
        .bind(req.hourly_rate_cents)
        .bind(req.experience_years)
        .bind(&req.portfolio_url)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::AlreadyExists("Photographer profile already exists".to_string());
            }
            log::error!("Failed to create photographer profile: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        let photographer = Self::get_by_id(pool, inserted.0).await?;
        log::info!("Created photographer profile: {}", photographer.id);
        Ok(photographer)
    }

    /// Retrieve profile by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Photographer, AppError> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PHOTOGRAPHER);

        sqlx::query_as::<_, Photographer>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch photographer"))?
            .ok_or_else(|| {
                log::warn!("Photographer not found: {}", id);
                AppError::NotFound(format!("Photographer {}", id))
            })
    }

    /// Retrieve the profile owned by a user, if any
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<Photographer>, AppError> {
        let sql = format!("{} WHERE p.user_id = $1", SELECT_PHOTOGRAPHER);

        sqlx::query_as::<_, Photographer>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(db_error("Failed to fetch photographer by user"))
    }

    /// Lock the photographer row for the rest of the transaction.
    /// Every calendar-changing write takes this lock first, so concurrent
    /// bookings for one photographer are checked and inserted one at a time.
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Photographer, AppError> {
        let sql = format!("{} WHERE p.id = $1 FOR UPDATE OF p", SELECT_PHOTOGRAPHER);

        sqlx::query_as::<_, Photographer>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to lock photographer"))?
            .ok_or_else(|| {
                log::warn!("Photographer not found: {}", id);
                AppError::NotFound(format!("Photographer {}", id))
            })
    }

    /// Search profiles with filters
    /// DOCUMENTATION: Returns tuple: (results, total_count) for pagination
    pub async fn search(
        pool: &PgPool,
        query: &PhotographerSearchQuery,
    ) -> Result<(Vec<Photographer>, i64), AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM photographers p JOIN users u ON u.id = p.user_id WHERE TRUE",
        );
        push_search_filters(&mut count_query, query);

        let (total,): (i64,) = count_query
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(db_error("Photographer count query failed"))?;

        let mut search_query = build_search_query(query);

        log::debug!("Executing photographer search: {}", search_query.sql());

        let photographers = search_query
            .build_query_as::<Photographer>()
            .fetch_all(pool)
            .await
            .map_err(db_error("Photographer search query failed"))?;

        log::info!(
            "Photographer search: {} results, {} total (page {})",
            photographers.len(),
            total,
            query.page()
        );

        Ok((photographers, total))
    }

    /// Update existing profile
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update_photographer(
        pool: &PgPool,
        id: Uuid,
        req: &UpdatePhotographerRequest,
    ) -> Result<Photographer, AppError> {
        let rows = sqlx::query(
            r#"
            UPDATE photographers
            SET bio = COALESCE($1, bio),
                location = COALESCE($2, location),
                specialties = COALESCE($3, specialties),
                hourly_rate_cents = COALESCE($4, hourly_rate_cents),
                experience_years = COALESCE($5, experience_years),
                portfolio_url = COALESCE($6, portfolio_url),
                is_available = COALESCE($7, is_available),
                updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&req.bio)
        .bind(&req.location)
        .bind(&req.specialties)
        .bind(req.hourly_rate_cents)
        .bind(req.experience_years)
        .bind(&req.portfolio_url)
        .bind(req.is_available)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for photographer {}: {}", id, e);
            AppError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Photographer {}", id)));
        }

        log::info!("Updated photographer profile: {}", id);
        Self::get_by_id(pool, id).await
    }

    /// Recompute rating (mean, 2 decimals) and review_count from the reviews table
    pub async fn refresh_rating(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE photographers p
            SET rating = stats.rating,
                review_count = stats.review_count,
                updated_at = NOW()
            FROM (
                SELECT
                    COALESCE(ROUND(AVG(rating)::numeric, 2), 0)::float8 AS rating,
                    COUNT(*)::int AS review_count
                FROM reviews
                WHERE photographer_id = $1
            ) stats
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .execute(conn)
        .await
        .map_err(db_error("Failed to refresh photographer rating"))?;

        Ok(())
    }
}

/// Append WHERE fragments for every provided filter. The base query must end
/// in a WHERE clause so each filter can start with AND.
fn push_search_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PhotographerSearchQuery) {
    if let Some(q) = query.q.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = contains_pattern(q);
        builder
            .push(" AND (u.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.bio ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(location) = query.location.as_deref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND p.location ILIKE ")
            .push_bind(contains_pattern(location));
    }

    if let Some(specialty) = query.specialty.as_deref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND EXISTS (SELECT 1 FROM unnest(p.specialties) s WHERE lower(s) = lower(")
            .push_bind(specialty.trim().to_string())
            .push("))");
    }

    if let Some(min_rate) = query.min_rate {
        builder.push(" AND p.hourly_rate_cents >= ").push_bind(min_rate);
    }

    if let Some(max_rate) = query.max_rate {
        builder.push(" AND p.hourly_rate_cents <= ").push_bind(max_rate);
    }

    if let Some(min_rating) = query.min_rating {
        builder.push(" AND p.rating >= ").push_bind(min_rating);
    }

    if let Some(available) = query.available {
        builder.push(" AND p.is_available = ").push_bind(available);
    }
}

fn build_search_query(query: &PhotographerSearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("{} WHERE TRUE", SELECT_PHOTOGRAPHER));
    push_search_filters(&mut builder, query);

    builder
        .push(" ORDER BY ")
        .push(query.sort.unwrap_or_default().order_by())
        .push(" LIMIT ")
        .push_bind(query.limit())
        .push(" OFFSET ")
        .push_bind(query.offset());

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhotographerSort;

    #[test]
    fn test_unfiltered_search_only_paginates() {
        let builder = build_search_query(&PhotographerSearchQuery::default());
        let sql = builder.sql();

        assert!(sql.contains("WHERE TRUE ORDER BY p.rating DESC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_filters_bind_in_order() {
        let query = PhotographerSearchQuery {
            q: Some("smith".into()),
            specialty: Some("Wedding".into()),
            min_rate: Some(5_000),
            available: Some(true),
            sort: Some(PhotographerSort::PriceAsc),
            ..Default::default()
        };
        let builder = build_search_query(&query);
        let sql = builder.sql();

        assert!(sql.contains("(u.name ILIKE $1 OR p.bio ILIKE $2)"));
        assert!(sql.contains("lower(s) = lower($3)"));
        assert!(sql.contains("p.hourly_rate_cents >= $4"));
        assert!(sql.contains("p.is_available = $5"));
        assert!(sql.contains("ORDER BY p.hourly_rate_cents ASC"));
        assert!(sql.ends_with("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn test_blank_text_filters_are_ignored() {
        let query = PhotographerSearchQuery {
            q: Some("   ".into()),
            location: Some(String::new()),
            ..Default::default()
        };
        let builder = build_search_query(&query);
        assert!(!builder.sql().contains("ILIKE"));
    }
}
