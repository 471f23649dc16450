//! Domain model definitions.

pub mod listing;
pub mod message;
pub mod order;
pub mod profile;
pub mod rating;

pub use listing::{CreateListingRequest, Listing, ListingFilters, ListingKind, ListingStatus};
pub use message::{AppendMessageRequest, Message, TranscriptResponse};
pub use order::{Order, OrderRole, OrderStatus};
pub use profile::{Profile, PublicProfile, UpsertProfileRequest};
pub use rating::{Rating, SubmitRatingRequest};
