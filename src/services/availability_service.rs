// src/services/availability_service.rs
// DOCUMENTATION: Declaring and removing open slots on a photographer's calendar

use crate::db::{AvailabilityRepository, PhotographerRepository};
use crate::errors::AppError;
use crate::models::{AvailabilitySlot, CreateAvailabilityRequest, TimeRange};
use crate::services::PhotographerService;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AvailabilityService;

/// First slot overlapping `candidate`. Slots with unreadable times count as overlapping.
pub fn find_overlapping_slot<'a>(
    candidate: &TimeRange,
    slots: &'a [AvailabilitySlot],
) -> Option<&'a AvailabilitySlot> {
    slots.iter().find(|slot| {
        TimeRange::parse(&slot.start_time, &slot.end_time)
            .map(|range| range.overlaps(candidate))
            .unwrap_or(true)
    })
}

impl AvailabilityService {
    pub async fn create_slot(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateAvailabilityRequest,
    ) -> Result<AvailabilitySlot, AppError> {
        let range = TimeRange::new(req.start_time, req.end_time).map_err(AppError::InvalidInput)?;
        if req.date < Utc::now().date_naive() {
            return Err(AppError::InvalidInput(format!(
                "Cannot open availability on past date {}",
                req.date
            )));
        }

        let own = PhotographerService::own_profile(pool, user_id).await?;

        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start availability transaction: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        PhotographerRepository::lock_by_id(&mut *tx, own.id).await?;

        let existing = AvailabilityRepository::list_for_date(&mut *tx, own.id, req.date).await?;
        if let Some(slot) = find_overlapping_slot(&range, &existing) {
            return Err(AppError::SlotOverlap(format!(
                "{} on {} overlaps slot [{}, {})",
                range, req.date, slot.start_time, slot.end_time
            )));
        }

        let slot = AvailabilityRepository::create_slot(&mut *tx, own.id, req.date, &range).await?;
        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit availability transaction: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        log::info!("Opened slot {} for photographer {} on {} {}", slot.id, own.id, slot.date, range);
        Ok(slot)
    }

    pub async fn delete_slot(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let own = PhotographerService::own_profile(pool, user_id).await?;
        let slot = AvailabilityRepository::get_by_id(pool, id).await?;

        if slot.photographer_id != own.id {
            return Err(AppError::Forbidden("You do not own this slot".to_string()));
        }

        if !AvailabilityRepository::delete_unbooked(pool, id).await? {
            return Err(AppError::AlreadyExists(
                "A booked slot cannot be deleted".to_string(),
            ));
        }

        log::info!("Deleted slot {} for photographer {}", id, own.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot {
            id: Uuid::new_v4(),
            photographer_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            is_booked: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_back_to_back_slots_are_allowed() {
        let slots = vec![slot("09:00", "12:00"), slot("14:00", "16:00")];
        let candidate = TimeRange::parse("12:00", "14:00").unwrap();
        assert!(find_overlapping_slot(&candidate, &slots).is_none());
    }

    #[test]
    fn test_overlapping_slot_is_found() {
        let slots = vec![slot("09:00", "12:00"), slot("14:00", "16:00")];
        let candidate = TimeRange::parse("15:30", "18:00").unwrap();
        let hit = find_overlapping_slot(&candidate, &slots).unwrap();
        assert_eq!(hit.start_time, "14:00");
    }
}
