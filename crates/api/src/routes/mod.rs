//! HTTP route handlers.

pub mod health;
pub mod listings;
pub mod messages;
pub mod orders;
pub mod profiles;
pub mod ratings;
