// src/models/package.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Priced, fixed-scope offering by a photographer
#[derive(Debug, Clone, FromRow)]
pub struct Package {
    pub id: Uuid,
    pub photographer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub deliverables: Vec<String>,
    /// Soft delete flag
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /packages
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: i64,

    #[validate(range(min = 15, max = 1440))]
    pub duration_minutes: i32,

    #[serde(default)]
    #[validate(length(max = 30))]
    pub deliverables: Vec<String>,
}

/// PUT /packages/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePackageRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: Option<i64>,

    #[validate(range(min = 15, max = 1440))]
    pub duration_minutes: Option<i32>,

    #[validate(length(max = 30))]
    pub deliverables: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageResponse {
    pub id: Uuid,
    pub photographer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub deliverables: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Package {
    pub fn to_response(&self) -> PackageResponse {
        PackageResponse {
            id: self.id,
            photographer_id: self.photographer_id,
            name: self.name.clone(),
            description: self.description.clone(),
            price_cents: self.price_cents,
            duration_minutes: self.duration_minutes,
            deliverables: self.deliverables.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
