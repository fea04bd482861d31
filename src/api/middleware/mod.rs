//! HTTP middleware for request processing and protection.
//!
//! Provides the gateway (authorization, rate limiting, security headers)
//! and observability middleware.

pub mod gateway;
pub mod tracing;
