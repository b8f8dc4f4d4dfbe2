// src/services/booking_service.rs
// DOCUMENTATION: Booking business logic
// PURPOSE: Conflict-checked creation, lifecycle transitions, payment and review of bookings
//
// All check-then-write paths run inside one transaction that holds a row lock
// (the photographer row for new bookings, the booking row for later changes).

use crate::db::{
    AvailabilityRepository, BookingRepository, PackageRepository, PaymentRepository,
    PhotographerRepository, ReviewRepository,
};
use crate::errors::AppError;
use crate::models::{
    Booking, BookingActor, BookingQuery, BookingResponse, BookingStatus, CreateBookingRequest,
    CreatePaymentRequest, CreateReviewRequest, NewBooking, NotificationKind, Package, Payment,
    PaymentStatus, ReviewResponse, TimeRange, UserRole,
};
use crate::services::{booking_notification, NotificationService};
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct BookingService;

/// First active booking whose range overlaps `candidate`
pub fn find_conflict<'a>(candidate: &TimeRange, existing: &'a [Booking]) -> Option<&'a Booking> {
    existing.iter().find(|booking| {
        let active = booking.status().map(|s| s.is_active()).unwrap_or(true);
        let overlaps = match booking.time_range() {
            Ok(range) => range.overlaps(candidate),
            Err(e) => {
                // Unreadable stored times block the slot rather than double book it
                log::error!("Booking {} has unreadable times: {}", booking.id, e);
                true
            }
        };
        active && overlaps
    })
}

/// Package price when a package is chosen, else the hourly rate pro rata (rounded down)
pub fn compute_price(hourly_rate_cents: i64, range: &TimeRange, package: Option<&Package>) -> i64 {
    match package {
        Some(package) => package.price_cents,
        None => hourly_rate_cents * range.duration_minutes() / 60,
    }
}

/// Which side of a booking the caller is on, if any
pub fn resolve_actor(
    booking: &Booking,
    user_id: Uuid,
    role: UserRole,
    own_profile: Option<Uuid>,
) -> Option<BookingActor> {
    if booking.client_id == user_id {
        Some(BookingActor::Client)
    } else if own_profile == Some(booking.photographer_id) {
        Some(BookingActor::Photographer)
    } else if role == UserRole::Admin {
        Some(BookingActor::Admin)
    } else {
        None
    }
}

fn notification_kind_for(status: BookingStatus) -> Option<NotificationKind> {
    match status {
        BookingStatus::Confirmed => Some(NotificationKind::BookingConfirmed),
        BookingStatus::InProgress => Some(NotificationKind::BookingStarted),
        BookingStatus::Completed => Some(NotificationKind::BookingCompleted),
        BookingStatus::Cancelled => Some(NotificationKind::BookingCancelled),
        BookingStatus::Pending => None,
    }
}

fn corrupt(booking: &Booking, e: String) -> AppError {
    log::error!("Booking {} has corrupt stored state: {}", booking.id, e);
    AppError::InternalError
}

async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    pool.begin().await.map_err(|e| {
        log::error!("Failed to start booking transaction: {}", e);
        AppError::DatabaseError(e.to_string())
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), AppError> {
    tx.commit().await.map_err(|e| {
        log::error!("Failed to commit booking transaction: {}", e);
        AppError::DatabaseError(e.to_string())
    })
}

impl BookingService {
    /// Reserve a time range with a photographer
    /// DOCUMENTATION: Rejects with BookingConflict when an active booking of the
    /// photographer on that date overlaps the requested half-open range
    pub async fn create_booking(
        pool: &PgPool,
        client_id: Uuid,
        req: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let range = TimeRange::new(req.start_time, req.end_time).map_err(AppError::InvalidInput)?;
        ensure_not_past(req.date, Utc::now().date_naive())?;

        let package = match req.package_id {
            Some(package_id) => {
                let package = PackageRepository::get_by_id(pool, package_id).await?;
                if package.photographer_id != req.photographer_id {
                    return Err(AppError::InvalidInput(format!(
                        "Package {} is not offered by this photographer",
                        package_id
                    )));
                }
                Some(package)
            }
            None => None,
        };

        let mut tx = begin(pool).await?;

        // Serializes concurrent bookings of the same photographer
        let photographer = PhotographerRepository::lock_by_id(&mut *tx, req.photographer_id).await?;

        if photographer.user_id == client_id {
            return Err(AppError::Forbidden(
                "You cannot book your own photographer profile".to_string(),
            ));
        }
        if !photographer.is_available {
            return Err(AppError::InvalidInput(
                "This photographer is not accepting bookings".to_string(),
            ));
        }

        let existing = BookingRepository::active_on_date(&mut *tx, photographer.id, req.date).await?;
        if let Some(conflict) = find_conflict(&range, &existing) {
            log::info!(
                "Rejected booking {} on {}: overlaps booking {}",
                range,
                req.date,
                conflict.id
            );
            return Err(AppError::BookingConflict(format!(
                "{} on {} overlaps an existing booking [{}, {})",
                range, req.date, conflict.start_time, conflict.end_time
            )));
        }

        let new_booking = NewBooking {
            client_id,
            photographer_id: photographer.id,
            package_id: package.as_ref().map(|p| p.id),
            date: req.date,
            total_price_cents: compute_price(photographer.hourly_rate_cents, &range, package.as_ref()),
            range,
            location: req.location,
            notes: req.notes,
        };

        let booking = BookingRepository::insert_booking(&mut *tx, &new_booking).await?;
        let marked =
            AvailabilityRepository::mark_booked(&mut *tx, photographer.id, booking.date, &new_booking.range)
                .await?;
        commit(tx).await?;

        log::debug!("Booking {} covers {} availability slots", booking.id, marked);
        NotificationService::notify(
            pool,
            booking_notification(photographer.user_id, NotificationKind::BookingRequested, &booking),
        )
        .await;

        Ok(booking.to_response())
    }

    /// Bookings where the caller is the client or the photographer
    pub async fn list_bookings(
        pool: &PgPool,
        user_id: Uuid,
        query: BookingQuery,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let own_profile = PhotographerRepository::find_by_user_id(pool, user_id)
            .await?
            .map(|p| p.id);
        let bookings = BookingRepository::list_for_user(pool, user_id, own_profile, query.status).await?;
        Ok(bookings.iter().map(|b| b.to_response()).collect())
    }

    pub async fn get_booking(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<BookingResponse, AppError> {
        let booking = BookingRepository::get_by_id(pool, id).await?;
        let own_profile = PhotographerRepository::find_by_user_id(pool, user_id)
            .await?
            .map(|p| p.id);

        if resolve_actor(&booking, user_id, role, own_profile).is_none() {
            return Err(AppError::Forbidden("You are not part of this booking".to_string()));
        }
        Ok(booking.to_response())
    }

    /// Move a booking along its lifecycle
    /// DOCUMENTATION: Cancelling frees the covered availability and refunds a paid booking
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        role: UserRole,
        next: BookingStatus,
    ) -> Result<BookingResponse, AppError> {
        let own_profile = PhotographerRepository::find_by_user_id(pool, user_id).await?;
        let own_profile_id = own_profile.as_ref().map(|p| p.id);

        let mut tx = begin(pool).await?;
        let booking = BookingRepository::lock_by_id(&mut *tx, id).await?;

        let actor = resolve_actor(&booking, user_id, role, own_profile_id)
            .ok_or_else(|| AppError::Forbidden("You are not part of this booking".to_string()))?;
        let current = booking.status().map_err(|e| corrupt(&booking, e))?;

        if !current.can_transition_to(next, actor) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move booking from {} to {}",
                current, next
            )));
        }

        let mut payment_status = booking.payment_status().map_err(|e| corrupt(&booking, e))?;
        if next == BookingStatus::Cancelled {
            let range = booking.time_range().map_err(|e| corrupt(&booking, e))?;
            let released = AvailabilityRepository::release(
                &mut *tx,
                booking.id,
                booking.photographer_id,
                booking.date,
                &range,
            )
            .await?;
            log::debug!("Cancelling booking {} released {} slots", booking.id, released);

            if payment_status == PaymentStatus::Paid {
                let refunded = PaymentRepository::refund_for_booking(&mut *tx, booking.id).await?;
                log::info!("Refunded {} payments for booking {}", refunded, booking.id);
                payment_status = PaymentStatus::Refunded;
            }
        }

        let updated = BookingRepository::update_status(&mut *tx, booking.id, next, payment_status).await?;
        commit(tx).await?;

        if let Some(kind) = notification_kind_for(next) {
            let recipient = match actor {
                BookingActor::Client => Self::photographer_user_id(pool, &updated).await,
                BookingActor::Photographer | BookingActor::Admin => Some(updated.client_id),
            };
            if let Some(recipient) = recipient {
                NotificationService::notify(pool, booking_notification(recipient, kind, &updated))
                    .await;
            }
        }

        Ok(updated.to_response())
    }

    /// Record the client's payment of the full booking price
    pub async fn pay_booking(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: CreatePaymentRequest,
    ) -> Result<Payment, AppError> {
        let mut tx = begin(pool).await?;
        let booking = BookingRepository::lock_by_id(&mut *tx, id).await?;

        if booking.client_id != user_id {
            return Err(AppError::Forbidden(
                "Only the booking's client can pay for it".to_string(),
            ));
        }

        let status = booking.status().map_err(|e| corrupt(&booking, e))?;
        let payment_status = booking.payment_status().map_err(|e| corrupt(&booking, e))?;
        ensure_payable(status, payment_status)?;

        let payment = PaymentRepository::record_payment(&mut *tx, &booking, req.method.trim()).await?;
        let updated =
            BookingRepository::update_status(&mut *tx, booking.id, status, PaymentStatus::Paid).await?;
        commit(tx).await?;

        if let Some(recipient) = Self::photographer_user_id(pool, &updated).await {
            NotificationService::notify(
                pool,
                booking_notification(recipient, NotificationKind::PaymentReceived, &updated),
            )
            .await;
        }

        Ok(payment)
    }

    /// Leave the single review of a completed booking
    pub async fn review_booking(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        let mut tx = begin(pool).await?;
        let booking = BookingRepository::lock_by_id(&mut *tx, id).await?;

        if booking.client_id != user_id {
            return Err(AppError::Forbidden(
                "Only the booking's client can review it".to_string(),
            ));
        }
        let status = booking.status().map_err(|e| corrupt(&booking, e))?;
        if status != BookingStatus::Completed {
            return Err(AppError::InvalidInput(format!(
                "Only completed bookings can be reviewed (booking is {})",
                status
            )));
        }

        let review = ReviewRepository::create_review(&mut *tx, &booking, &req).await?;
        PhotographerRepository::refresh_rating(&mut *tx, booking.photographer_id).await?;
        commit(tx).await?;

        log::info!("Review {} added for booking {}", review.id, booking.id);
        if let Some(recipient) = Self::photographer_user_id(pool, &booking).await {
            NotificationService::notify(
                pool,
                booking_notification(recipient, NotificationKind::ReviewReceived, &booking),
            )
            .await;
        }

        Ok(review.to_response())
    }

    async fn photographer_user_id(pool: &PgPool, booking: &Booking) -> Option<Uuid> {
        match PhotographerRepository::get_by_id(pool, booking.photographer_id).await {
            Ok(photographer) => Some(photographer.user_id),
            Err(e) => {
                log::warn!("No notification recipient for booking {}: {}", booking.id, e);
                None
            }
        }
    }
}

fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::InvalidInput(format!(
            "Booking date {} is in the past",
            date
        )));
    }
    Ok(())
}

fn ensure_payable(status: BookingStatus, payment_status: PaymentStatus) -> Result<(), AppError> {
    match payment_status {
        PaymentStatus::Paid => {
            return Err(AppError::AlreadyExists("Booking is already paid".to_string()))
        }
        PaymentStatus::Refunded => {
            return Err(AppError::InvalidInput("Booking was refunded".to_string()))
        }
        PaymentStatus::Unpaid => {}
    }

    match status {
        BookingStatus::Confirmed | BookingStatus::InProgress | BookingStatus::Completed => Ok(()),
        other => Err(AppError::InvalidInput(format!(
            "A {} booking cannot be paid",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeOfDay;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    fn booking(start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            photographer_id: Uuid::new_v4(),
            package_id: None,
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            location: None,
            notes: None,
            status: status.as_str().into(),
            payment_status: PaymentStatus::Unpaid.as_str().into(),
            total_price_cents: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_worked_example() {
        let calendar = vec![booking("10:00", "12:00", BookingStatus::Confirmed)];

        // B [11:00, 13:00) overlaps A
        assert!(find_conflict(&range("11:00", "13:00"), &calendar).is_some());
        // C [12:00, 14:00) starts where A ends
        assert!(find_conflict(&range("12:00", "14:00"), &calendar).is_none());
    }

    #[test]
    fn test_disjoint_ranges_never_conflict() {
        let calendar = vec![
            booking("08:00", "09:00", BookingStatus::Pending),
            booking("15:00", "17:30", BookingStatus::InProgress),
        ];
        assert!(find_conflict(&range("09:00", "15:00"), &calendar).is_none());
        assert!(find_conflict(&range("18:00", "19:00"), &calendar).is_none());
    }

    #[test]
    fn test_containment_in_either_direction_conflicts() {
        let calendar = vec![booking("10:00", "16:00", BookingStatus::Pending)];
        assert!(find_conflict(&range("11:00", "12:00"), &calendar).is_some());

        let calendar = vec![booking("11:00", "12:00", BookingStatus::Confirmed)];
        assert!(find_conflict(&range("09:00", "18:00"), &calendar).is_some());
    }

    #[test]
    fn test_identical_range_conflicts() {
        let calendar = vec![booking("10:00", "12:00", BookingStatus::Pending)];
        let hit = find_conflict(&range("10:00", "12:00"), &calendar).unwrap();
        assert_eq!(hit.start_time, "10:00");
    }

    #[test]
    fn test_inactive_bookings_are_ignored() {
        let calendar = vec![
            booking("10:00", "12:00", BookingStatus::Cancelled),
            booking("10:00", "12:00", BookingStatus::Completed),
        ];
        assert!(find_conflict(&range("10:30", "11:30"), &calendar).is_none());
    }

    #[test]
    fn test_hourly_price_is_pro_rata_rounded_down() {
        assert_eq!(compute_price(10_000, &range("10:00", "12:00"), None), 20_000);
        assert_eq!(compute_price(10_000, &range("10:00", "10:45"), None), 7_500);
        assert_eq!(compute_price(999, &range("10:00", "10:20"), None), 333);
    }

    #[test]
    fn test_package_price_wins() {
        let package = Package {
            id: Uuid::new_v4(),
            photographer_id: Uuid::new_v4(),
            name: "Wedding day".into(),
            description: None,
            price_cents: 150_000,
            duration_minutes: 480,
            deliverables: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            compute_price(10_000, &range("10:00", "11:00"), Some(&package)),
            150_000
        );
    }

    #[test]
    fn test_resolve_actor() {
        let b = booking("10:00", "11:00", BookingStatus::Pending);
        let stranger = Uuid::new_v4();

        assert_eq!(
            resolve_actor(&b, b.client_id, UserRole::Client, None),
            Some(BookingActor::Client)
        );
        assert_eq!(
            resolve_actor(&b, stranger, UserRole::Photographer, Some(b.photographer_id)),
            Some(BookingActor::Photographer)
        );
        assert_eq!(
            resolve_actor(&b, stranger, UserRole::Admin, None),
            Some(BookingActor::Admin)
        );
        assert_eq!(
            resolve_actor(&b, stranger, UserRole::Photographer, Some(Uuid::new_v4())),
            None
        );
    }

    #[test]
    fn test_payable_states() {
        use BookingStatus::*;
        use PaymentStatus::*;

        assert!(ensure_payable(Confirmed, Unpaid).is_ok());
        assert!(ensure_payable(Completed, Unpaid).is_ok());
        assert!(matches!(ensure_payable(Pending, Unpaid), Err(AppError::InvalidInput(_))));
        assert!(matches!(ensure_payable(Cancelled, Unpaid), Err(AppError::InvalidInput(_))));
        assert!(matches!(ensure_payable(Confirmed, Paid), Err(AppError::AlreadyExists(_))));
        assert!(matches!(ensure_payable(Cancelled, Refunded), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_past_dates_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2030, 6, 10).unwrap();
        assert!(ensure_not_past(today, today).is_ok());
        assert!(ensure_not_past(today.succ_opt().unwrap(), today).is_ok());
        assert!(ensure_not_past(today.pred_opt().unwrap(), today).is_err());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let start = TimeOfDay::new(12, 0).unwrap();
        let end = TimeOfDay::new(10, 0).unwrap();
        assert!(TimeRange::new(start, end).is_err());
        assert!(TimeRange::new(start, start).is_err());
    }
}
