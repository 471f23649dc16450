//! Order lifecycle rules.
//!
//! Pure functions shared by every entry point that mutates an order, so the
//! accept/complete/deliver/cancel buttons on any screen all go through the
//! same state machine. The persistence layer re-checks the same edges with
//! conditional updates; these functions give callers the typed error before
//! a round trip, and the database settles races.

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Listing, ListingStatus, Order, OrderStatus};

/// Buyer and seller resolved at acceptance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parties {
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
}

/// Resolves who buys and who sells when `accepter_id` accepts a listing.
///
/// Accepting an offer makes the accepter the buyer; accepting a buyer
/// request makes the accepter the seller. Owners cannot accept their own
/// listings.
pub fn resolve_parties(listing: &Listing, accepter_id: Uuid) -> Result<Parties, DomainError> {
    if listing.owner_id == accepter_id {
        return Err(DomainError::Validation(
            "You cannot accept your own listing".to_string(),
        ));
    }

    let parties = if listing.kind.is_offer() {
        Parties {
            buyer_id: accepter_id,
            seller_id: listing.owner_id,
        }
    } else {
        Parties {
            buyer_id: listing.owner_id,
            seller_id: accepter_id,
        }
    };

    debug_assert_ne!(parties.buyer_id, parties.seller_id);
    Ok(parties)
}

/// Checks a listing is still open for acceptance or cancellation.
pub fn ensure_listing_active(listing: &Listing) -> Result<(), DomainError> {
    match listing.status {
        ListingStatus::Active => Ok(()),
        ListingStatus::Accepted => Err(DomainError::InvalidState(
            "This listing has already been claimed".to_string(),
        )),
        ListingStatus::Cancelled => Err(DomainError::InvalidState(
            "This listing has been cancelled".to_string(),
        )),
    }
}

/// Checks the requester owns the listing.
pub fn ensure_owner(listing: &Listing, requester_id: Uuid) -> Result<(), DomainError> {
    if listing.owner_id == requester_id {
        Ok(())
    } else {
        Err(DomainError::NotOwner)
    }
}

/// Checks the requester is the order's seller.
pub fn ensure_seller(order: &Order, requester_id: Uuid) -> Result<(), DomainError> {
    if order.seller_id == requester_id {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized(
            "Only the seller can perform this action".to_string(),
        ))
    }
}

/// Checks the requester is the order's buyer.
pub fn ensure_buyer(order: &Order, requester_id: Uuid) -> Result<(), DomainError> {
    if order.buyer_id == requester_id {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized(
            "Only the buyer can perform this action".to_string(),
        ))
    }
}

/// Checks the requester is the order's buyer or seller.
pub fn ensure_participant(order: &Order, requester_id: Uuid) -> Result<(), DomainError> {
    if order.role_of(requester_id).is_some() {
        Ok(())
    } else {
        Err(DomainError::NotParticipant)
    }
}

/// Checks that moving the order to `next` is a defined lifecycle edge.
pub fn guard_transition(order: &Order, next: OrderStatus) -> Result<(), DomainError> {
    if order.status.can_transition_to(next) {
        return Ok(());
    }
    if order.status.is_terminal() {
        Err(DomainError::InvalidState(format!(
            "Order is already {}",
            order.status
        )))
    } else {
        Err(DomainError::InvalidState(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )))
    }
}

/// Statuses a seller may complete from.
pub const COMPLETE_FROM: &[OrderStatus] = &[OrderStatus::Confirmed];

/// Statuses a buyer may confirm delivery from. Seller completion and buyer
/// confirmation may happen in either order; delivered absorbs both paths.
pub const DELIVER_FROM: &[OrderStatus] = &[OrderStatus::Confirmed, OrderStatus::Completed];

/// Statuses either party may cancel from.
pub const CANCEL_FROM: &[OrderStatus] = &[
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Completed,
];

/// Checks an order is open for rating and the rater is a participant.
/// Returns the rated counterparty.
pub fn resolve_rating(order: &Order, rater_id: Uuid) -> Result<Uuid, DomainError> {
    ensure_participant(order, rater_id)?;

    if !order.status.allows_rating() {
        return Err(DomainError::InvalidState(
            "Orders can only be rated after completion or delivery".to_string(),
        ));
    }

    let already_rated = match order.role_of(rater_id) {
        Some(crate::models::OrderRole::Buyer) => order.buyer_rated,
        Some(crate::models::OrderRole::Seller) => order.seller_rated,
        None => unreachable!("participant checked above"),
    };
    if already_rated {
        return Err(DomainError::DuplicateRating);
    }

    // Participant guaranteed above, so the counterparty exists.
    order
        .counterparty_of(rater_id)
        .ok_or(DomainError::NotParticipant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingKind;
    use chrono::{NaiveTime, Utc};

    fn listing(kind: ListingKind, status: ListingStatus) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind,
            venue: "Clark Kerr".to_string(),
            pickup_date: Utc::now().date_naive(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: None,
            price_cents: 700,
            notes: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn order(status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            dining_offer_id: Some(Uuid::new_v4()),
            grubhub_offer_id: None,
            buyer_request_id: None,
            buyer_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            item_kind: ListingKind::DiningOffer,
            venue: "Clark Kerr".to_string(),
            pickup_date: Utc::now().date_naive(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: None,
            price_cents: 700,
            status,
            buyer_rated: false,
            seller_rated: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_accepting_offer_makes_accepter_buyer() {
        let l = listing(ListingKind::DiningOffer, ListingStatus::Active);
        let accepter = Uuid::new_v4();
        let parties = resolve_parties(&l, accepter).unwrap();
        assert_eq!(parties.buyer_id, accepter);
        assert_eq!(parties.seller_id, l.owner_id);
    }

    #[test]
    fn test_accepting_request_makes_accepter_seller() {
        let l = listing(ListingKind::BuyerRequest, ListingStatus::Active);
        let accepter = Uuid::new_v4();
        let parties = resolve_parties(&l, accepter).unwrap();
        assert_eq!(parties.seller_id, accepter);
        assert_eq!(parties.buyer_id, l.owner_id);
    }

    #[test]
    fn test_cannot_accept_own_listing() {
        let l = listing(ListingKind::GrubhubOffer, ListingStatus::Active);
        let result = resolve_parties(&l, l.owner_id);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_ensure_listing_active() {
        assert!(ensure_listing_active(&listing(
            ListingKind::DiningOffer,
            ListingStatus::Active
        ))
        .is_ok());
        for status in [ListingStatus::Accepted, ListingStatus::Cancelled] {
            let result = ensure_listing_active(&listing(ListingKind::DiningOffer, status));
            assert!(matches!(result, Err(DomainError::InvalidState(_))));
        }
    }

    #[test]
    fn test_ensure_owner() {
        let l = listing(ListingKind::DiningOffer, ListingStatus::Active);
        assert!(ensure_owner(&l, l.owner_id).is_ok());
        assert_eq!(ensure_owner(&l, Uuid::new_v4()), Err(DomainError::NotOwner));
    }

    #[test]
    fn test_role_guards() {
        let o = order(OrderStatus::Confirmed);
        assert!(ensure_seller(&o, o.seller_id).is_ok());
        assert!(ensure_buyer(&o, o.buyer_id).is_ok());
        assert!(matches!(
            ensure_seller(&o, o.buyer_id),
            Err(DomainError::NotAuthorized(_))
        ));
        assert!(matches!(
            ensure_buyer(&o, o.seller_id),
            Err(DomainError::NotAuthorized(_))
        ));
        assert_eq!(
            ensure_participant(&o, Uuid::new_v4()),
            Err(DomainError::NotParticipant)
        );
    }

    #[test]
    fn test_guard_transition_rejects_undefined_edges() {
        let delivered = order(OrderStatus::Delivered);
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(matches!(
                guard_transition(&delivered, next),
                Err(DomainError::InvalidState(_))
            ));
        }

        let confirmed = order(OrderStatus::Confirmed);
        assert!(guard_transition(&confirmed, OrderStatus::Completed).is_ok());
        assert!(guard_transition(&confirmed, OrderStatus::Delivered).is_ok());
        assert!(guard_transition(&confirmed, OrderStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_resolve_rating_happy_path() {
        let o = order(OrderStatus::Delivered);
        let rated = resolve_rating(&o, o.buyer_id).unwrap();
        assert_eq!(rated, o.seller_id);
        let rated = resolve_rating(&o, o.seller_id).unwrap();
        assert_eq!(rated, o.buyer_id);
    }

    #[test]
    fn test_resolve_rating_rejects_open_order() {
        let o = order(OrderStatus::Confirmed);
        assert!(matches!(
            resolve_rating(&o, o.buyer_id),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_resolve_rating_rejects_duplicate() {
        let mut o = order(OrderStatus::Delivered);
        o.buyer_rated = true;
        assert_eq!(
            resolve_rating(&o, o.buyer_id),
            Err(DomainError::DuplicateRating)
        );
        // Seller side still open
        assert!(resolve_rating(&o, o.seller_id).is_ok());
    }

    #[test]
    fn test_resolve_rating_rejects_stranger() {
        let o = order(OrderStatus::Delivered);
        assert_eq!(
            resolve_rating(&o, Uuid::new_v4()),
            Err(DomainError::NotParticipant)
        );
    }

    #[test]
    fn test_completed_order_can_still_be_rated_by_both() {
        let o = order(OrderStatus::Completed);
        assert!(resolve_rating(&o, o.buyer_id).is_ok());
        assert!(resolve_rating(&o, o.seller_id).is_ok());
    }
}
