// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod auth;
pub mod availability;
pub mod bookings;
pub mod extractors;
pub mod health;
pub mod notifications;
pub mod packages;
pub mod payments;
pub mod photographers;

pub use auth::config as auth_config;
pub use availability::config as availability_config;
pub use bookings::config as bookings_config;
pub use health::config as health_config;
pub use notifications::config as notifications_config;
pub use packages::config as packages_config;
pub use payments::config as payments_config;
pub use photographers::config as photographers_config;
