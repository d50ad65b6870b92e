use crate::models::PropertyType;
use crate::search::criteria::{Criteria, Selection, SortKey, DISTANCE_BOUNDS, PRICE_BOUNDS};

/// Lossless mapping between `Criteria` and the search view's URL query
/// string (`search, minPrice, maxPrice, minDistance, maxDistance,
/// amenities (repeated), bedrooms, bathrooms, propertyType, sortBy`).
impl Criteria {
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<(String, String)> = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("search".into(), self.search.clone()));
        }
        pairs.push(("minPrice".into(), fmt_num(self.min_price)));
        pairs.push(("maxPrice".into(), fmt_num(self.max_price)));
        pairs.push(("minDistance".into(), fmt_num(self.min_distance)));
        pairs.push(("maxDistance".into(), fmt_num(self.max_distance)));
        for amenity in &self.amenities {
            pairs.push(("amenities".into(), amenity.clone()));
        }
        if let Some(v) = selection_value(&self.bedrooms, |n| n.to_string()) {
            pairs.push(("bedrooms".into(), v));
        }
        if let Some(v) = selection_value(&self.bathrooms, |n| n.to_string()) {
            pairs.push(("bathrooms".into(), v));
        }
        if let Some(v) = selection_value(&self.property_type, |t| t.to_string()) {
            pairs.push(("propertyType".into(), v));
        }
        pairs.push(("sortBy".into(), self.sort_by.as_str().into()));

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string back into criteria. Absent numeric bounds take
    /// the documented defaults; unparsable numbers are treated as absent;
    /// an unrecognized sortBy falls back to price ascending.
    pub fn from_query(query: &str) -> Criteria {
        let mut criteria = Criteria::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(raw);
            match key {
                "search" => criteria.search = value,
                "minPrice" => criteria.min_price = parse_num(&value, PRICE_BOUNDS.0),
                "maxPrice" => criteria.max_price = parse_num(&value, PRICE_BOUNDS.1),
                "minDistance" => criteria.min_distance = parse_num(&value, DISTANCE_BOUNDS.0),
                "maxDistance" => criteria.max_distance = parse_num(&value, DISTANCE_BOUNDS.1),
                "amenities" => {
                    if !value.is_empty() {
                        criteria.amenities.push(value);
                    }
                }
                "bedrooms" => criteria.bedrooms = parse_selection(&value, |s| s.parse().ok()),
                "bathrooms" => criteria.bathrooms = parse_selection(&value, |s| s.parse().ok()),
                "propertyType" => {
                    criteria.property_type = parse_selection(&value, PropertyType::parse)
                }
                "sortBy" => criteria.sort_by = SortKey::parse(&value),
                _ => {}
            }
        }

        criteria
    }
}

fn selection_value<T>(selection: &Selection<T>, render: impl Fn(&T) -> String) -> Option<String> {
    match selection {
        Selection::Unset => None,
        Selection::Any => Some("any".to_string()),
        Selection::Exact(v) => Some(render(v)),
    }
}

fn parse_selection<T>(value: &str, parse: impl Fn(&str) -> Option<T>) -> Selection<T> {
    if value.eq_ignore_ascii_case("any") {
        Selection::Any
    } else {
        match parse(value) {
            Some(v) => Selection::Exact(v),
            None => Selection::Unset,
        }
    }
}

fn parse_num(value: &str, default: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => default,
    }
}

/// Render without a trailing ".0" for whole numbers, matching how the
/// query string is written by hand
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn decode(raw: &str) -> String {
    // Browsers write spaces as '+' in query strings; our encoder uses %20.
    // Accept both on the way in.
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|c| c.into_owned())
        .unwrap_or(plus_decoded)
}
