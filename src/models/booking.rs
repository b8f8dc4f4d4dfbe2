// src/models/booking.rs
// DOCUMENTATION: Booking records, lifecycle states and request DTOs
// PURPOSE: Status machine and data shapes for the booking endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::{TimeOfDay, TimeRange};

/// Booking lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

/// Who is asking for a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Client,
    Photographer,
    Admin,
}

impl BookingStatus {
    /// Statuses that hold a photographer's calendar
    pub const ACTIVE: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Active statuses as stored strings, for `= ANY($n)` binds
    pub fn active_strs() -> Vec<String> {
        Self::ACTIVE.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// Whether `actor` may move a booking from `self` to `next`.
    /// Admins may take any edge that exists for some role; the role check is skipped for them.
    pub fn can_transition_to(&self, next: BookingStatus, actor: BookingActor) -> bool {
        use BookingActor::*;
        use BookingStatus::*;

        let allowed: &[BookingActor] = match (self, next) {
            (Pending, Confirmed) => &[Photographer],
            (Pending, Cancelled) | (Confirmed, Cancelled) => &[Client, Photographer],
            (Confirmed, InProgress) => &[Photographer],
            (InProgress, Completed) => &[Photographer],
            _ => &[],
        };

        !allowed.is_empty() && (actor == Admin || allowed.contains(&actor))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// Payment state tracked on the booking itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// Row of the bookings table
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub photographer_id: Uuid,
    pub package_id: Option<Uuid>,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn status(&self) -> Result<BookingStatus, String> {
        self.status.parse()
    }

    pub fn payment_status(&self) -> Result<PaymentStatus, String> {
        self.payment_status.parse()
    }

    pub fn time_range(&self) -> Result<TimeRange, String> {
        TimeRange::parse(&self.start_time, &self.end_time)
    }

    pub fn to_response(&self) -> BookingResponse {
        BookingResponse {
            id: self.id,
            client_id: self.client_id,
            photographer_id: self.photographer_id,
            package_id: self.package_id,
            date: self.date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            location: self.location.clone(),
            notes: self.notes.clone(),
            status: self.status.clone(),
            payment_status: self.payment_status.clone(),
            total_price_cents: self.total_price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Values for a booking insert, after validation and pricing
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: Uuid,
    pub photographer_id: Uuid,
    pub package_id: Option<Uuid>,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub total_price_cents: i64,
}

/// POST /bookings
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub photographer_id: Uuid,

    pub package_id: Option<Uuid>,

    /// ISO date, YYYY-MM-DD
    pub date: NaiveDate,

    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,

    #[validate(length(max = 500))]
    pub location: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// PATCH /bookings/{id}/status
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// GET /bookings
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub photographer_id: Uuid,
    pub package_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
