use crate::api::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, Listing, ListingDraft, Role};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Seam between the session store and the auth endpoints.
/// Lets session logic be tested against a stub backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApiResult<AuthResponse>;

    /// Set or clear the bearer credential attached to outgoing calls.
    fn set_auth_token(&self, token: Option<&str>);
}

/// Typed client over the accommodation REST API.
///
/// One method per endpoint; each is a single request/response exchange with
/// no retry or backoff. Failures propagate to the caller untouched.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("accommo-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().expect("token lock poisoned");
        match token.as_deref() {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn check(resp: Response) -> ApiResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        warn!("API call failed with status {}: {}", status, message);
        match status.as_u16() {
            401 | 403 => Err(ApiError::Auth(message)),
            404 => Err(ApiError::NotFound(message)),
            s => Err(ApiError::Server { status: s, message }),
        }
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
        let resp = Self::check(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// `GET /accommodations`
    pub async fn list_listings(&self) -> ApiResult<Vec<Listing>> {
        debug!("Fetching all listings");
        let resp = self
            .with_auth(self.client.get(self.url("/accommodations")))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `GET /accommodations/{id}`
    pub async fn get_listing(&self, id: u64) -> ApiResult<Listing> {
        debug!("Fetching listing {}", id);
        let resp = self
            .with_auth(self.client.get(self.url(&format!("/accommodations/{id}"))))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `GET /accommodations/broker/{brokerId}`
    pub async fn listings_by_broker(&self, broker_id: u64) -> ApiResult<Vec<Listing>> {
        debug!("Fetching listings for broker {}", broker_id);
        let resp = self
            .with_auth(
                self.client
                    .get(self.url(&format!("/accommodations/broker/{broker_id}"))),
            )
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `POST /accommodations` multipart: JSON metadata plus photo attachments
    pub async fn create_listing(
        &self,
        draft: &ListingDraft,
        photos: &[PathBuf],
    ) -> ApiResult<Listing> {
        debug!("Creating listing '{}' with {} photos", draft.title, photos.len());
        let form = Self::listing_form(draft, photos).await?;
        let resp = self
            .with_auth(self.client.post(self.url("/accommodations")))
            .multipart(form)
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `PUT /accommodations/{id}` multipart, same shape as create.
    /// The full draft is resent; the backend does not take partial updates.
    pub async fn update_listing(
        &self,
        id: u64,
        draft: &ListingDraft,
        photos: &[PathBuf],
    ) -> ApiResult<Listing> {
        debug!("Updating listing {}", id);
        let form = Self::listing_form(draft, photos).await?;
        let resp = self
            .with_auth(self.client.put(self.url(&format!("/accommodations/{id}"))))
            .multipart(form)
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `DELETE /accommodations/{id}`
    pub async fn delete_listing(&self, id: u64) -> ApiResult<()> {
        debug!("Deleting listing {}", id);
        let resp = self
            .with_auth(
                self.client
                    .delete(self.url(&format!("/accommodations/{id}"))),
            )
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Build the multipart body: an `accommodation` part carrying the draft
    /// as JSON, then one `photos` part per attachment.
    async fn listing_form(draft: &ListingDraft, photos: &[PathBuf]) -> ApiResult<Form> {
        let metadata = serde_json::to_string(draft)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let metadata_part = Part::text(metadata)
            .mime_str("application/json")
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let mut form = Form::new().part("accommodation", metadata_part);
        for path in photos {
            form = form.part("photos", Self::photo_part(path).await?);
        }
        Ok(form)
    }

    async fn photo_part(path: &Path) -> ApiResult<Part> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Photo {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Part::bytes(bytes).file_name(file_name))
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    /// `POST /auth/login`
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        debug!("Logging in as {}", username);
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// `POST /auth/register`
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApiResult<AuthResponse> {
        debug!("Registering {} as {}", username, role.as_str());
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
                "role": role.as_str(),
            }))
            .send()
            .await?;
        Self::parse(resp).await
    }

    fn set_auth_token(&self, token: Option<&str>) {
        let mut guard = self.token.write().expect("token lock poisoned");
        *guard = token.map(|t| t.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::split_amenities;

    fn draft() -> ListingDraft {
        ListingDraft {
            title: "Sunny 2BR".to_string(),
            address: "5 Campus Lane".to_string(),
            price: 8000.0,
            distance_from_university: 0.8,
            amenities: split_amenities("WiFi, Parking"),
            contact_email: "broker@example.com".to_string(),
            contact_phone: "555-0101".to_string(),
            broker_username: "brokerb".to_string(),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            client.url("/accommodations/3"),
            "http://localhost:8080/api/accommodations/3"
        );
    }

    #[test]
    fn draft_serializes_to_wire_shape() {
        let value = serde_json::to_value(draft()).unwrap();
        assert_eq!(value["distanceFromUniversity"], 0.8);
        assert_eq!(value["brokerUsername"], "brokerb");
        assert_eq!(value["amenities"], serde_json::json!(["WiFi", "Parking"]));
    }

    #[tokio::test]
    async fn listing_form_rejects_missing_photo() {
        let missing = PathBuf::from("/definitely/not/here.jpg");
        let err = ApiClient::listing_form(&draft(), &[missing]).await.unwrap_err();
        assert!(matches!(err, ApiError::Photo { .. }));
    }

    #[test]
    fn token_propagation_is_clearable() {
        let client = ApiClient::new("http://localhost:8080/api").unwrap();
        client.set_auth_token(Some("abc"));
        assert_eq!(client.token.read().unwrap().as_deref(), Some("abc"));
        client.set_auth_token(None);
        assert!(client.token.read().unwrap().is_none());
    }
}
