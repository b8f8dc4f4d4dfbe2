// src/services/photographer_service.rs
// DOCUMENTATION: Business logic for photographer profiles
// PURPOSE: Intermediary between handlers and repositories for profiles, search and public listings

use crate::db::{
    AvailabilityRepository, PackageRepository, PhotographerRepository, ReviewRepository,
};
use crate::errors::AppError;
use crate::models::{
    AvailabilityQuery, AvailabilitySlot, CreatePhotographerRequest, PackageResponse, Photographer,
    PhotographerDetailResponse, PhotographerResponse, PhotographerSearchQuery,
    PhotographerSearchResponse, ReviewResponse, UpdatePhotographerRequest, UserRole,
    MAX_AVAILABILITY_WINDOW_DAYS,
};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Reviews embedded in the profile detail view
const DETAIL_REVIEWS: i64 = 10;
/// Reviews returned by the reviews listing
const REVIEW_PAGE: i64 = 50;
/// Window used when the availability query gives no end date
const DEFAULT_AVAILABILITY_DAYS: i64 = 30;

pub struct PhotographerService;

impl PhotographerService {
    /// Create the caller's own profile
    pub async fn create_profile(
        pool: &PgPool,
        user_id: Uuid,
        role: UserRole,
        req: CreatePhotographerRequest,
    ) -> Result<PhotographerResponse, AppError> {
        if role != UserRole::Photographer {
            return Err(AppError::Forbidden(
                "Only photographer accounts can create a profile".to_string(),
            ));
        }

        let photographer = PhotographerRepository::create_photographer(pool, user_id, &req).await?;
        Ok(photographer.to_response())
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdatePhotographerRequest,
    ) -> Result<PhotographerResponse, AppError> {
        let own = Self::own_profile(pool, user_id).await?;
        let photographer = PhotographerRepository::update_photographer(pool, own.id, &req).await?;
        Ok(photographer.to_response())
    }

    /// Profile owned by the caller; Forbidden when they have none
    pub async fn own_profile(pool: &PgPool, user_id: Uuid) -> Result<Photographer, AppError> {
        PhotographerRepository::find_by_user_id(pool, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("A photographer profile is required for this action".to_string())
            })
    }

    /// Profile with active packages and recent reviews
    pub async fn get_photographer(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<PhotographerDetailResponse, AppError> {
        let photographer = PhotographerRepository::get_by_id(pool, id).await?;
        let packages = PackageRepository::get_packages_by_photographer(pool, id).await?;
        let reviews = ReviewRepository::get_reviews_by_photographer(pool, id, DETAIL_REVIEWS).await?;

        Ok(PhotographerDetailResponse {
            photographer: photographer.to_response(),
            packages: packages.iter().map(|p| p.to_response()).collect(),
            reviews: reviews.iter().map(|r| r.to_response()).collect(),
        })
    }

    pub async fn search_photographers(
        pool: &PgPool,
        query: PhotographerSearchQuery,
    ) -> Result<PhotographerSearchResponse, AppError> {
        if let (Some(min), Some(max)) = (query.min_rate, query.max_rate) {
            if min > max {
                return Err(AppError::InvalidInput(
                    "min_rate must not exceed max_rate".to_string(),
                ));
            }
        }

        let (photographers, total_count) = PhotographerRepository::search(pool, &query).await?;

        Ok(PhotographerSearchResponse {
            data: photographers.iter().map(|p| p.to_response()).collect(),
            total_count,
            page: query.page(),
            limit: query.limit(),
            has_more: query.has_more(total_count),
        })
    }

    pub async fn list_packages(pool: &PgPool, id: Uuid) -> Result<Vec<PackageResponse>, AppError> {
        // 404 for unknown photographers rather than an empty list
        PhotographerRepository::get_by_id(pool, id).await?;
        let packages = PackageRepository::get_packages_by_photographer(pool, id).await?;
        Ok(packages.iter().map(|p| p.to_response()).collect())
    }

    pub async fn list_reviews(pool: &PgPool, id: Uuid) -> Result<Vec<ReviewResponse>, AppError> {
        PhotographerRepository::get_by_id(pool, id).await?;
        let reviews = ReviewRepository::get_reviews_by_photographer(pool, id, REVIEW_PAGE).await?;
        Ok(reviews.iter().map(|r| r.to_response()).collect())
    }

    pub async fn list_availability(
        pool: &PgPool,
        id: Uuid,
        query: AvailabilityQuery,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        let (from, to) = availability_window(&query, Utc::now().date_naive())?;
        PhotographerRepository::get_by_id(pool, id).await?;
        AvailabilityRepository::list_between(pool, id, from, to).await
    }
}

/// Resolve the inclusive date window for an availability listing
pub fn availability_window(
    query: &AvailabilityQuery,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let from = query.from.unwrap_or(today);
    let to = match query.to {
        Some(to) => to,
        None => from
            .checked_add_signed(Duration::days(DEFAULT_AVAILABILITY_DAYS))
            .ok_or_else(|| AppError::InvalidInput("'from' is out of range".to_string()))?,
    };

    if to < from {
        return Err(AppError::InvalidInput("'to' must not be before 'from'".to_string()));
    }
    if (to - from).num_days() > MAX_AVAILABILITY_WINDOW_DAYS {
        return Err(AppError::InvalidInput(format!(
            "Availability window is limited to {} days",
            MAX_AVAILABILITY_WINDOW_DAYS
        )));
    }

    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_defaults_to_thirty_days_from_today() {
        let today = date(2030, 1, 10);
        let (from, to) = availability_window(&AvailabilityQuery::default(), today).unwrap();
        assert_eq!(from, today);
        assert_eq!(to, date(2030, 2, 9));
    }

    #[test]
    fn test_window_rejects_reversed_and_oversized_ranges() {
        let today = date(2030, 1, 10);

        let reversed = AvailabilityQuery {
            from: Some(date(2030, 3, 1)),
            to: Some(date(2030, 2, 1)),
        };
        assert!(availability_window(&reversed, today).is_err());

        let oversized = AvailabilityQuery {
            from: Some(date(2030, 1, 1)),
            to: Some(date(2030, 6, 1)),
        };
        assert!(availability_window(&oversized, today).is_err());

        let single_day = AvailabilityQuery {
            from: Some(date(2030, 1, 1)),
            to: Some(date(2030, 1, 1)),
        };
        assert!(availability_window(&single_day, today).is_ok());
    }

    #[test]
    fn test_window_default_end_past_calendar_limit_is_invalid() {
        let query = AvailabilityQuery {
            from: Some(NaiveDate::MAX),
            to: None,
        };
        assert!(matches!(
            availability_window(&query, date(2030, 1, 10)),
            Err(AppError::InvalidInput(_))
        ));
    }
}
