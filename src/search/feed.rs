use crate::models::Listing;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory listing snapshot with a per-fetch sequence number.
///
/// Every refresh takes a ticket before the network call and commits with it
/// after; a commit whose ticket is no longer the latest issued is discarded,
/// so a response that arrives after the view moved on never overwrites a
/// newer snapshot.
pub struct ListingFeed {
    latest_ticket: AtomicU64,
    listings: Vec<Listing>,
    fetched_at: Option<DateTime<Utc>>,
}

impl ListingFeed {
    pub fn new() -> Self {
        Self {
            latest_ticket: AtomicU64::new(0),
            listings: Vec::new(),
            fetched_at: None,
        }
    }

    /// Issue a ticket for a fetch that is about to start
    pub fn begin_fetch(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a completed fetch. Returns false (and leaves the snapshot
    /// untouched) when a newer fetch was started in the meantime.
    pub fn commit(&mut self, ticket: u64, listings: Vec<Listing>) -> bool {
        if ticket != self.latest_ticket.load(Ordering::SeqCst) {
            tracing::debug!("Discarding superseded fetch (ticket {})", ticket);
            return false;
        }
        self.listings = listings;
        self.fetched_at = Some(Utc::now());
        true
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

impl Default for ListingFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;

    fn listing(id: u64) -> Listing {
        Listing {
            id,
            title: format!("Listing {id}"),
            address: "somewhere".to_string(),
            price: 1000.0,
            distance_from_university: 1.0,
            amenities: vec![],
            photos: vec![],
            contact_email: "x@y.com".to_string(),
            contact_phone: "000".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            property_type: PropertyType::Apartment,
        }
    }

    #[test]
    fn latest_fetch_wins() {
        let mut feed = ListingFeed::new();
        let first = feed.begin_fetch();
        let second = feed.begin_fetch();

        // The older fetch resolves late and must be discarded
        assert!(feed.commit(second, vec![listing(2)]));
        assert!(!feed.commit(first, vec![listing(1)]));

        let ids: Vec<u64> = feed.listings().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn commit_records_fetch_time() {
        let mut feed = ListingFeed::new();
        assert!(feed.fetched_at().is_none());
        let ticket = feed.begin_fetch();
        assert!(feed.commit(ticket, vec![listing(1)]));
        assert!(feed.fetched_at().is_some());
    }
}
