//! Repository implementations for database operations.

pub mod listing;
pub mod message;
pub mod order;
pub mod profile;
pub mod rating;

pub use listing::ListingRepository;
pub use message::MessageRepository;
pub use order::OrderRepository;
pub use profile::ProfileRepository;
pub use rating::RatingRepository;
