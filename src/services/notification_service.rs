// src/services/notification_service.rs
// DOCUMENTATION: In-app notifications for booking, payment and review events

use crate::db::NotificationRepository;
use crate::errors::AppError;
use crate::models::{Booking, NewNotification, Notification, NotificationKind};
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationService;

impl NotificationService {
    /// Store a notification. Failures are logged and swallowed so the
    /// triggering request still succeeds.
    pub async fn notify(pool: &PgPool, notification: NewNotification) {
        if let Err(e) = NotificationRepository::create_notification(pool, &notification).await {
            log::warn!(
                "Dropped {} notification for user {}: {}",
                notification.kind.as_str(),
                notification.user_id,
                e
            );
        }
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AppError> {
        NotificationRepository::list_for_user(pool, user_id, unread_only).await
    }

    pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Notification, AppError> {
        NotificationRepository::mark_read(pool, id, user_id).await
    }

    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
        let updated = NotificationRepository::mark_all_read(pool, user_id).await?;
        log::debug!("Marked {} notifications read for user {}", updated, user_id);
        Ok(updated)
    }
}

/// Notification for a booking event, addressed to `recipient`
pub fn booking_notification(
    recipient: Uuid,
    kind: NotificationKind,
    booking: &Booking,
) -> NewNotification {
    let when = format!("{} {}-{}", booking.date, booking.start_time, booking.end_time);
    let (title, message) = match kind {
        NotificationKind::BookingRequested => (
            "New booking request",
            format!("You have a new booking request for {}.", when),
        ),
        NotificationKind::BookingConfirmed => (
            "Booking confirmed",
            format!("Your booking for {} has been confirmed.", when),
        ),
        NotificationKind::BookingStarted => (
            "Session started",
            format!("Your session for {} is in progress.", when),
        ),
        NotificationKind::BookingCompleted => (
            "Session completed",
            format!("Your session for {} is complete. You can now leave a review.", when),
        ),
        NotificationKind::BookingCancelled => (
            "Booking cancelled",
            format!("The booking for {} was cancelled.", when),
        ),
        NotificationKind::PaymentReceived => (
            "Payment received",
            format!(
                "Payment of {} received for the booking on {}.",
                format_cents(booking.total_price_cents),
                when
            ),
        ),
        NotificationKind::ReviewReceived => (
            "New review",
            format!("Your client left a review for the session on {}.", when),
        ),
    };

    NewNotification {
        user_id: recipient,
        kind,
        title: title.to_string(),
        message,
        link: Some(format!("/bookings/{}", booking.id)),
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            photographer_id: Uuid::new_v4(),
            package_id: None,
            date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            start_time: "10:00".into(),
            end_time: "12:00".into(),
            location: None,
            notes: None,
            status: "confirmed".into(),
            payment_status: "paid".into(),
            total_price_cents: 25050,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_booking_notification_links_to_booking() {
        let booking = booking();
        let recipient = booking.photographer_id;
        let n = booking_notification(recipient, NotificationKind::BookingRequested, &booking);

        assert_eq!(n.user_id, recipient);
        assert_eq!(n.link, Some(format!("/bookings/{}", booking.id)));
        assert!(n.message.contains("2030-05-01 10:00-12:00"));
    }

    #[test]
    fn test_payment_notification_formats_amount() {
        let booking = booking();
        let n = booking_notification(booking.photographer_id, NotificationKind::PaymentReceived, &booking);
        assert!(n.message.contains("$250.50"));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(120000), "$1200.00");
        assert_eq!(format_cents(-250), "-$2.50");
    }
}
