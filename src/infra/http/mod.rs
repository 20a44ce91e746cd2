//! Resilient HTTP layer for the CMS REST API.

pub mod auth;
pub mod backoff;
pub mod client;
pub mod error;

pub use auth::{CsrfTokenSource, MemoryCsrfToken, MemoryTokenStore, NoCsrfToken, TokenStore};
pub use backoff::RetryPolicy;
pub use client::{
    ApiClient, ApiClientBuilder, CSRF_PATH, CallBody, CallOptions, MultipartField, MultipartValue,
    TOKEN_OBTAIN_PATH, TOKEN_REFRESH_PATH,
};
pub use error::{ApiError, ResponseBody};
