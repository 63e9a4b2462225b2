//! CSRF token handling.
//!
//! The backend authenticates the browser session elsewhere; this client
//! only needs to echo the `csrftoken` cookie back as a header on
//! state-changing requests.

pub mod csrf;

pub use csrf::CookieStore;
