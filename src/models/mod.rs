// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod auth_token;
pub mod availability;
pub mod booking;
pub mod notification;
pub mod package;
pub mod payment;
pub mod photographer;
pub mod review;
pub mod schedule;
pub mod user;

pub use auth_token::*;
pub use availability::*;
pub use booking::*;
pub use notification::*;
pub use package::*;
pub use payment::*;
pub use photographer::*;
pub use review::*;
pub use schedule::*;
pub use user::*;
