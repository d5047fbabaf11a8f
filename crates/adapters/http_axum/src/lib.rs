//! # irrigator-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON control API** (`/api/state`, `/api/pump/{on,off}`,
//!   `/api/automation`, …)
//! - Serve a **server-side-rendered status page** that works with
//!   **zero JavaScript**: HTML forms + `<meta http-equiv="refresh">` at the
//!   poll period
//! - Map HTTP requests into irrigation service calls (driving adapter)
//!
//! ## Dependency rule
//! Depends on `irrigator-app` (for the port trait and the service) and
//! `irrigator-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
