//! Client for the Listinator shopping list API.
//!
//! - [`api`]: HTTP client for lists, entries, types and sessions.
//! - [`notifications`]: the shared store of user-facing notifications.
//! - [`pages`]: views that call the API and report through notifications.
//! - [`routes`]: the static path-to-page table.

pub mod api;
pub mod config;
pub mod models;
pub mod notifications;
pub mod pages;
pub mod routes;
