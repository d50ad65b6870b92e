use crate::models::Listing;
use crate::search::criteria::{Criteria, SortKey};

/// Derive the displayed subset: filter by every criterion, then order by the
/// selected sort key. Pure and deterministic; the input is never mutated and
/// the result is always a subset of it. Runs on every criteria change, so it
/// stays a linear scan plus one comparison sort.
pub fn apply(listings: &[Listing], criteria: &Criteria) -> Vec<Listing> {
    let mut matched: Vec<Listing> = listings
        .iter()
        .filter(|listing| passes(listing, criteria))
        .cloned()
        .collect();

    // Vec::sort_by is stable, so equal keys keep their input order
    matched.sort_by(|a, b| match criteria.sort_by {
        SortKey::PriceAsc => a.price.total_cmp(&b.price),
        SortKey::PriceDesc => b.price.total_cmp(&a.price),
        SortKey::DistanceAsc => a
            .distance_from_university
            .total_cmp(&b.distance_from_university),
        SortKey::DistanceDesc => b
            .distance_from_university
            .total_cmp(&a.distance_from_university),
    });

    matched
}

fn passes(listing: &Listing, criteria: &Criteria) -> bool {
    let needle = criteria.search.to_lowercase();
    let matches_search = needle.is_empty()
        || listing.title.to_lowercase().contains(&needle)
        || listing.address.to_lowercase().contains(&needle);

    let matches_price = listing.price >= criteria.min_price && listing.price <= criteria.max_price;
    let matches_distance = listing.distance_from_university >= criteria.min_distance
        && listing.distance_from_university <= criteria.max_distance;

    // Vacuously true when no amenities are selected
    let matches_amenities = criteria
        .amenities
        .iter()
        .all(|wanted| listing.amenities.iter().any(|a| a == wanted));

    matches_search
        && matches_price
        && matches_distance
        && matches_amenities
        && criteria.bedrooms.matches(&listing.bedrooms)
        && criteria.bathrooms.matches(&listing.bathrooms)
        && criteria.property_type.matches(&listing.property_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;
    use crate::search::criteria::Selection;

    fn listing(id: u64, title: &str, price: f64, distance: f64) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            address: format!("{id} University Rd"),
            price,
            distance_from_university: distance,
            amenities: vec!["WiFi".to_string(), "AC".to_string()],
            photos: vec![],
            contact_email: "x@y.com".to_string(),
            contact_phone: "000".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            property_type: PropertyType::Apartment,
        }
    }

    fn catalog() -> Vec<Listing> {
        vec![
            listing(1, "SRM Heights", 5000.0, 1.0),
            listing(2, "SRM Annex", 5000.0, 3.0),
            listing(3, "Budget Rooms", 3000.0, 2.0),
        ]
    }

    #[test]
    fn price_sort_is_stable_on_ties() {
        let out = apply(&catalog(), &Criteria::default());
        let ids: Vec<u64> = out.iter().map(|l| l.id).collect();
        // 3000 first, then the two 5000s in input order
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn result_is_subset_of_input() {
        let input = catalog();
        let out = apply(
            &input,
            &Criteria {
                search: "srm".to_string(),
                ..Criteria::default()
            },
        );
        assert!(out.len() <= input.len());
        for l in &out {
            assert!(input.iter().any(|i| i.id == l.id));
        }
        let ids: Vec<u64> = out.iter().map(|l| l.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn filtering_is_idempotent() {
        let criteria = Criteria {
            min_price: 4000.0,
            max_price: 6000.0,
            ..Criteria::default()
        };
        let once = apply(&catalog(), &criteria);
        let twice = apply(&once, &criteria);
        let ids = |v: &[Listing]| v.iter().map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn search_and_price_combine() {
        let criteria = Criteria {
            search: "srm".to_string(),
            min_price: 4000.0,
            max_price: 6000.0,
            ..Criteria::default()
        };
        let ids: Vec<u64> = apply(&catalog(), &criteria).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_matches_address_too() {
        let criteria = Criteria {
            search: "3 university".to_string(),
            ..Criteria::default()
        };
        let ids: Vec<u64> = apply(&catalog(), &criteria).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn amenity_selection_is_monotonic() {
        let mut input = catalog();
        input[2].amenities = vec!["WiFi".to_string()];

        let mut criteria = Criteria::default();
        let all = apply(&input, &criteria).len();

        criteria.amenities.push("WiFi".to_string());
        let wifi = apply(&input, &criteria).len();

        criteria.amenities.push("AC".to_string());
        let wifi_ac = apply(&input, &criteria).len();

        assert!(wifi <= all);
        assert!(wifi_ac <= wifi);
        assert_eq!(wifi_ac, 2);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let criteria = Criteria {
            min_price: 3000.0,
            max_price: 3000.0,
            min_distance: 2.0,
            max_distance: 2.0,
            ..Criteria::default()
        };
        let ids: Vec<u64> = apply(&catalog(), &criteria).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn distance_desc_orders_farthest_first() {
        let criteria = Criteria {
            sort_by: SortKey::DistanceDesc,
            ..Criteria::default()
        };
        let ids: Vec<u64> = apply(&catalog(), &criteria).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn exact_bedroom_filter_narrows() {
        let mut input = catalog();
        input[0].bedrooms = 3;

        let criteria = Criteria {
            bedrooms: Selection::Exact(3),
            ..Criteria::default()
        };
        let ids: Vec<u64> = apply(&input, &criteria).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1]);

        let criteria = Criteria {
            bedrooms: Selection::Any,
            ..Criteria::default()
        };
        assert_eq!(apply(&input, &criteria).len(), 3);
    }
}
