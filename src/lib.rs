//! Girder: content pipeline and API client for the Girder construction CMS.
//!
//! The crate has three cooperating parts:
//!
//! - [`application::render`] converts the CMS rich-text editor's op-log
//!   format into sanitized, styled HTML and post-processes raw HTML
//!   bodies the same way.
//! - [`infra::http`] is the resilient REST client: timeouts, capped
//!   exponential backoff, one automatic bearer-token refresh per call,
//!   anti-forgery token injection.
//! - [`domain`] holds the op-log document model and content-field
//!   classification shared by both.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
