// src/services/payment_service.rs
// DOCUMENTATION: Payment listings and the photographer earnings summary

use crate::db::{BookingRepository, PaymentRepository, PhotographerRepository};
use crate::errors::AppError;
use crate::models::{MonthlyEarnings, Payment, PaymentSummary};
use crate::services::PhotographerService;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Months covered by the earnings breakdown, current month included
pub const SUMMARY_MONTHS: u32 = 6;

pub struct PaymentService;

impl PaymentService {
    /// Payments the caller made or received
    pub async fn list_payments(pool: &PgPool, user_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let own_profile = PhotographerRepository::find_by_user_id(pool, user_id)
            .await?
            .map(|p| p.id);
        PaymentRepository::list_for_user(pool, user_id, own_profile).await
    }

    pub async fn summary(pool: &PgPool, user_id: Uuid) -> Result<PaymentSummary, AppError> {
        let own = PhotographerService::own_profile(pool, user_id).await?;
        let now = Utc::now();
        let months = month_keys(now.date_naive(), SUMMARY_MONTHS);

        let since = months
            .first()
            .and_then(|first| NaiveDate::parse_from_str(&format!("{}-01", first), "%Y-%m-%d").ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let (total_earned_cents, refunded_cents, completed_payments) =
            PaymentRepository::totals(pool, own.id).await?;
        let pending_cents = BookingRepository::unpaid_active_total(pool, own.id).await?;
        let rows = PaymentRepository::monthly_earnings(pool, own.id, since).await?;

        Ok(PaymentSummary {
            total_earned_cents,
            refunded_cents,
            pending_cents,
            completed_payments,
            monthly: fill_months(&months, rows),
        })
    }
}

/// "YYYY-MM" keys for the `count` months ending with the month of `today`, oldest first
pub fn month_keys(today: NaiveDate, count: u32) -> Vec<String> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1)
        })
        .collect()
}

/// One entry per month key; months without payments get zeros
pub fn fill_months(months: &[String], rows: Vec<MonthlyEarnings>) -> Vec<MonthlyEarnings> {
    months
        .iter()
        .map(|month| {
            rows.iter()
                .find(|row| &row.month == month)
                .cloned()
                .unwrap_or_else(|| MonthlyEarnings {
                    month: month.clone(),
                    amount_cents: 0,
                    payments: 0,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_keys_cross_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2031, 2, 15).unwrap();
        assert_eq!(
            month_keys(today, 6),
            vec!["2030-09", "2030-10", "2030-11", "2030-12", "2031-01", "2031-02"]
        );
    }

    #[test]
    fn test_fill_months_inserts_zero_months() {
        let months = month_keys(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(), 3);
        let rows = vec![MonthlyEarnings {
            month: "2030-05".into(),
            amount_cents: 45_000,
            payments: 2,
        }];

        let filled = fill_months(&months, rows);
        assert_eq!(filled.len(), 3);
        assert_eq!(filled[0].month, "2030-04");
        assert_eq!(filled[0].amount_cents, 0);
        assert_eq!(filled[1].amount_cents, 45_000);
        assert_eq!(filled[1].payments, 2);
        assert_eq!(filled[2].month, "2030-06");
        assert_eq!(filled[2].payments, 0);
    }

    #[test]
    fn test_rows_outside_the_window_are_dropped() {
        let months = vec!["2030-06".to_string()];
        let rows = vec![MonthlyEarnings {
            month: "2029-01".into(),
            amount_cents: 1,
            payments: 1,
        }];
        assert_eq!(fill_months(&months, rows)[0].amount_cents, 0);
    }
}
