//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod listing;
pub mod message;
pub mod order;
pub mod profile;
pub mod rating;

pub use listing::{ListingEntity, ListingKindDb, ListingStatusDb};
pub use message::MessageEntity;
pub use order::{OrderEntity, OrderStatusDb};
pub use profile::ProfileEntity;
pub use rating::RatingEntity;
