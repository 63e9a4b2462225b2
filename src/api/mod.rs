//! REST API client module for the section management backend.
//!
//! This module provides the `ApiClient` for fetching roster and
//! attendance data and for pushing field edits back.
//!
//! State-changing requests carry a CSRF token in the `X-CSRFToken`
//! header; reads are unauthenticated from the client's point of view.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
