//! Domain layer for the Meal Share backend.
//!
//! This crate contains:
//! - Domain models (Profile, Listing, Order, Message, Rating)
//! - The order lifecycle state machine and participant rules
//! - Domain error types

pub mod error;
pub mod lifecycle;
pub mod models;
