// src/models/photographer.rs
// DOCUMENTATION: Photographer profile records, search parameters and responses
// PURPOSE: Serialization/deserialization models for the photographer API and queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{PackageResponse, ReviewResponse};

/// Photographer profile joined with the owning user's display fields
/// DOCUMENTATION: Maps the photographers table plus users.name / users.image_url
#[derive(Debug, Clone, FromRow)]
pub struct Photographer {
    pub id: Uuid,
    pub user_id: Uuid,

    /// From users.name
    pub name: String,

    /// From users.image_url
    pub image_url: Option<String>,

    pub bio: Option<String>,
    pub location: Option<String>,
    pub specialties: Vec<String>,

    /// Hourly rate in cents, used when a booking has no package
    pub hourly_rate_cents: i64,

    pub experience_years: i32,
    pub portfolio_url: Option<String>,

    /// Mean review rating (0 when there are no reviews)
    pub rating: f64,
    pub review_count: i32,

    /// Whether the photographer accepts new bookings
    pub is_available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /photographers/profile
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePhotographerRequest {
    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub specialties: Vec<String>,

    #[validate(range(min = 0, max = 10_000_000))]
    pub hourly_rate_cents: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = 80))]
    pub experience_years: i32,

    #[validate(url)]
    pub portfolio_url: Option<String>,
}

/// PUT /photographers/profile
/// All fields are optional - only provided fields are updated
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePhotographerRequest {
    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 20))]
    pub specialties: Option<Vec<String>>,

    #[validate(range(min = 0, max = 10_000_000))]
    pub hourly_rate_cents: Option<i64>,

    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,

    #[validate(url)]
    pub portfolio_url: Option<String>,

    pub is_available: Option<bool>,
}

/// Sort order for photographer search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotographerSort {
    #[default]
    Rating,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl PhotographerSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            PhotographerSort::Rating => "p.rating DESC, p.review_count DESC, p.created_at DESC",
            PhotographerSort::PriceAsc => "p.hourly_rate_cents ASC, p.rating DESC",
            PhotographerSort::PriceDesc => "p.hourly_rate_cents DESC, p.rating DESC",
            PhotographerSort::Newest => "p.created_at DESC",
        }
    }
}

/// Search query parameters
/// DOCUMENTATION: DTO for parsing query string in /photographers/search
/// All parameters are optional for flexible searching
#[derive(Debug, Default, Deserialize)]
pub struct PhotographerSearchQuery {
    /// Free text matched against name and bio
    pub q: Option<String>,

    /// Substring match on location
    pub location: Option<String>,

    /// Exact specialty tag (case-insensitive)
    pub specialty: Option<String>,

    /// Hourly rate bounds in cents
    pub min_rate: Option<i64>,
    pub max_rate: Option<i64>,

    pub min_rating: Option<f64>,

    /// Only photographers accepting bookings
    pub available: Option<bool>,

    pub sort: Option<PhotographerSort>,

    /// Page number (1-based)
    pub page: Option<i64>,

    /// Results per page (max 100)
    pub limit: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

impl PhotographerSearchQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates for absurd page numbers so the query yields an empty page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn has_more(&self, total_count: i64) -> bool {
        total_count > self.page().saturating_mul(self.limit())
    }
}

/// Response DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct PhotographerResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub specialties: Vec<String>,
    pub hourly_rate_cents: i64,
    pub experience_years: i32,
    pub portfolio_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Detailed response DTO
/// DOCUMENTATION: Used for GET /photographers/{id}
#[derive(Debug, Serialize)]
pub struct PhotographerDetailResponse {
    #[serde(flatten)]
    pub photographer: PhotographerResponse,
    pub packages: Vec<PackageResponse>,
    pub reviews: Vec<ReviewResponse>,
}

/// Paginated search response
#[derive(Debug, Serialize)]
pub struct PhotographerSearchResponse {
    pub data: Vec<PhotographerResponse>,

    /// Total number of matches (regardless of pagination)
    pub total_count: i64,

    pub page: i64,
    pub limit: i64,

    /// Whether more results exist on next page
    pub has_more: bool,
}

impl Photographer {
    pub fn to_response(&self) -> PhotographerResponse {
        PhotographerResponse {
            id: self.id,
            user_id: self.user_id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            specialties: self.specialties.clone(),
            hourly_rate_cents: self.hourly_rate_cents,
            experience_years: self.experience_years,
            portfolio_url: self.portfolio_url.clone(),
            rating: self.rating,
            review_count: self.review_count,
            is_available: self.is_available,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_bounds() {
        let query = PhotographerSearchQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = PhotographerSearchQuery {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 200);

        let query = PhotographerSearchQuery {
            page: Some(-4),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let query = PhotographerSearchQuery {
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert_eq!(query.offset(), i64::MAX);
        assert!(!query.has_more(1_000));

        let query = PhotographerSearchQuery {
            page: Some(i64::MAX),
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(query.offset(), i64::MAX - 1);
    }

    #[test]
    fn test_has_more() {
        let query = PhotographerSearchQuery {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        assert!(query.has_more(21));
        assert!(!query.has_more(20));
    }

    #[test]
    fn test_profile_validation() {
        let req = CreatePhotographerRequest {
            bio: None,
            location: Some("Lisbon".into()),
            specialties: vec!["wedding".into()],
            hourly_rate_cents: -1,
            experience_years: 3,
            portfolio_url: Some("not a url".into()),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("hourly_rate_cents"));
        assert!(fields.contains_key("portfolio_url"));
        assert!(!fields.contains_key("location"));
    }

    #[test]
    fn test_sort_parses_from_query_value() {
        let sort: PhotographerSort = serde_json::from_str("\"price_desc\"").unwrap();
        assert_eq!(sort, PhotographerSort::PriceDesc);
        assert_eq!(PhotographerSort::default(), PhotographerSort::Rating);
    }
}
