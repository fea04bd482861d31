//! Server-rendered pages.
//!
//! Access to these pages is decided by the gateway; a denied browser is sent
//! to `/login?redirect=<path>` instead of receiving a JSON error. Uses Askama
//! templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
