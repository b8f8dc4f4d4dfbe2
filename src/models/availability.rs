// src/models/availability.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TimeOfDay;

/// Photographer-declared open slot
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub photographer_id: Uuid,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

/// POST /availability
#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// GET /photographers/{id}/availability
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Longest window returned by a single availability query
pub const MAX_AVAILABILITY_WINDOW_DAYS: i64 = 92;
