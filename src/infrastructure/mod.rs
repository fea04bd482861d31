//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`credentials`] - Session token signing and verification
//! - [`persistence`] - PostgreSQL repository implementations

pub mod credentials;
pub mod persistence;
