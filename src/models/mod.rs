use serde::{Deserialize, Serialize};

/// Role of an authenticated account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "BROKER")]
    Broker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Broker => "BROKER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "BROKER" => Ok(Role::Broker),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Fixed enumeration of listing property types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyType {
    Apartment,
    House,
    Studio,
    Dormitory,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Studio => "Studio",
            PropertyType::Dormitory => "Dormitory",
        }
    }

    /// Case-insensitive parse, used by both the CLI and the query-string codec
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "apartment" => Some(PropertyType::Apartment),
            "house" => Some(PropertyType::House),
            "studio" => Some(PropertyType::Studio),
            "dormitory" => Some(PropertyType::Dormitory),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account record as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Payload of a successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Core listing data model, a read-only snapshot fetched per session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub address: String,
    pub price: f64,
    pub distance_from_university: f64,
    pub amenities: Vec<String>,
    pub photos: Vec<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: PropertyType,
}

/// Metadata a broker submits when creating or updating a listing.
/// Photos travel separately as multipart attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub address: String,
    pub price: f64,
    pub distance_from_university: f64,
    pub amenities: Vec<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub broker_username: String,
}

/// Split a user-entered comma-separated amenity string into a clean list.
/// Fragments are trimmed and empty ones dropped.
pub fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(|a| a.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenities_split_and_trimmed() {
        assert_eq!(split_amenities("WiFi, AC , ,TV"), vec!["WiFi", "AC", "TV"]);
        assert_eq!(split_amenities(""), Vec::<String>::new());
        assert_eq!(split_amenities(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn listing_uses_wire_field_names() {
        let json = r#"{
            "id": 7,
            "title": "Cozy studio",
            "address": "12 College Rd",
            "price": 5500.0,
            "distanceFromUniversity": 1.2,
            "amenities": ["WiFi"],
            "photos": [],
            "contactEmail": "a@b.com",
            "contactPhone": "123",
            "bedrooms": 1,
            "bathrooms": 1,
            "propertyType": "Studio"
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.distance_from_university, 1.2);
        assert_eq!(listing.property_type, PropertyType::Studio);

        let back = serde_json::to_value(&listing).unwrap();
        assert!(back.get("distanceFromUniversity").is_some());
        assert!(back.get("contactEmail").is_some());
    }

    #[test]
    fn role_wire_values_are_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Broker).unwrap(), "\"BROKER\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
