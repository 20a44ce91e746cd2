//! Shared request and response types for the Girder CMS REST API.
//!
//! These mirror the backend's JSON contracts: DRF-style integer ids,
//! RFC 3339 timestamps, and a `count/next/previous/results` pagination
//! envelope. Content bodies (`content`, `long_description`, `bio`, ...)
//! are opaque strings here; the `girder` crate's render pipeline decides
//! whether a body is raw HTML or a rich-editor op-log.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(api_date, Date, "[year]-[month]-[day]");

/// Standard paginated list envelope returned by every collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Homepage hero banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub video: Option<String>,
    pub video_poster: Option<String>,
    pub video_autoplay: bool,
    pub video_muted: bool,
    pub video_loop: bool,
    pub is_active: bool,
    pub order: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: i64,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub order: u32,
}

/// Construction project with gallery images and a nested category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    /// Rich body: HTML or a JSON-encoded op-log.
    pub long_description: String,
    pub cover_image: Option<String>,
    pub status: String,
    #[serde(default, with = "api_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "api_date::option")]
    pub end_date: Option<Date>,
    pub is_featured: bool,
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
    pub order: u32,
}

/// Published article. `category` is a bare id on this endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub featured_image: Option<String>,
    pub featured_image_alt: String,
    pub thumbnail: Option<String>,
    pub excerpt: String,
    /// Rich body: HTML or a JSON-encoded op-log.
    pub content: String,
    pub reading_time_minutes: Option<u32>,
    pub status: String,
    pub tags: String,
    pub category: Option<i64>,
    pub view_count: u64,
    pub is_featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub is_active: bool,
    pub order: u32,
}

/// Offered service. Unlike posts, the category comes nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub featured_image_alt: String,
    /// Rich body: HTML or a JSON-encoded op-log.
    pub content: String,
    pub reading_time_minutes: Option<u32>,
    pub category: Option<ServiceCategory>,
    pub status: String,
    pub is_featured: bool,
    pub order: u32,
    pub view_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub photo: Option<String>,
    pub linkedin_url: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub is_active: bool,
    pub order: u32,
}

/// Singleton site configuration consumed by the header/footer loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: i64,
    pub company_name: String,
    pub about_excerpt: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub business_hours: String,
    pub logo: Option<String>,
    pub logo_alt_text: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub x_url: String,
    pub linkedin_url: String,
}

/// Contact/lead submission payload (`POST /api/leads/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub source: String,
}

/// Credentials for `POST /api/token/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenObtainRequest {
    pub username: String,
    pub password: String,
}

/// Access/refresh pair issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body for `POST /api/token/refresh/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

/// Response from `POST /api/token/refresh/`; some deployments rotate the
/// refresh token as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Response from `GET /api/csrf/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrfResponse {
    pub csrftoken: String,
}
