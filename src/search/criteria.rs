use crate::models::PropertyType;

/// Documented price bounds used when a range is absent from the query string
pub const PRICE_BOUNDS: (f64, f64) = (0.0, 20_000.0);
/// Documented distance bounds (km)
pub const DISTANCE_BOUNDS: (f64, f64) = (0.0, 10.0);

/// A count/type filter that distinguishes "no filter chosen" from an
/// explicit "any". Both match every listing; only `Exact` narrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Unset,
    Any,
    Exact(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::Unset | Selection::Any => true,
            Selection::Exact(wanted) => wanted == value,
        }
    }
}

/// Sort key for the result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    DistanceAsc,
    DistanceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::DistanceAsc => "distance_asc",
            SortKey::DistanceDesc => "distance_desc",
        }
    }

    /// Unrecognized values fall back to the default (price ascending)
    pub fn parse(s: &str) -> SortKey {
        match s {
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            "distance_asc" => SortKey::DistanceAsc,
            "distance_desc" => SortKey::DistanceDesc,
            _ => SortKey::default(),
        }
    }
}

/// Search criteria driving the filter/sort engine, mirrored bidirectionally
/// into the URL query string so a search is shareable and bookmarkable.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub search: String,
    pub min_price: f64,
    pub max_price: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// A listing must contain every selected amenity
    pub amenities: Vec<String>,
    pub bedrooms: Selection<u32>,
    pub bathrooms: Selection<u32>,
    pub property_type: Selection<PropertyType>,
    pub sort_by: SortKey,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            min_price: PRICE_BOUNDS.0,
            max_price: PRICE_BOUNDS.1,
            min_distance: DISTANCE_BOUNDS.0,
            max_distance: DISTANCE_BOUNDS.1,
            amenities: Vec::new(),
            bedrooms: Selection::Unset,
            bathrooms: Selection::Unset,
            property_type: Selection::Unset,
            sort_by: SortKey::default(),
        }
    }
}
