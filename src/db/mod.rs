// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod availability_repository;
pub mod booking_repository;
pub mod notification_repository;
pub mod package_repository;
pub mod payment_repository;
pub mod photographer_repository;
pub mod review_repository;
pub mod token_repository;
pub mod user_repository;

pub use availability_repository::*;
pub use booking_repository::*;
pub use notification_repository::*;
pub use package_repository::*;
pub use payment_repository::*;
pub use photographer_repository::*;
pub use review_repository::*;
pub use token_repository::*;
pub use user_repository::*;

use crate::errors::AppError;

/// Map a sqlx failure to a logged DatabaseError
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        log::error!("{}: {}", context, e);
        AppError::DatabaseError(format!("{}: {}", context, e))
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Build an ILIKE pattern matching `term` anywhere, with LIKE wildcards escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("wedding"), "%wedding%");
        assert_eq!(contains_pattern("  50%_off "), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
