// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod availability_service;
pub mod booking_service;
pub mod cleanup;
pub mod mailer;
pub mod notification_service;
pub mod package_service;
pub mod password;
pub mod payment_service;
pub mod photographer_service;
pub mod rate_limit;
pub mod tokens;

pub use auth_service::*;
pub use availability_service::*;
pub use booking_service::*;
pub use cleanup::*;
pub use mailer::*;
pub use notification_service::*;
pub use package_service::*;
pub use password::*;
pub use payment_service::*;
pub use photographer_service::*;
pub use rate_limit::*;
pub use tokens::*;
