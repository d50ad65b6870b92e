pub mod client;
pub mod error;

pub use client::{ApiClient, AuthBackend};
pub use error::{ApiError, ApiResult};
