//! Domain layer containing the gateway's and the inbox's core types.
//!
//! # Architecture
//!
//! - [`identity`] - Roles and per-request identity claims
//! - [`credentials`] - Port to the credential collaborator
//! - [`entities`] - Message records and the unified feed projection
//! - [`repositories`] - Origin store trait definitions

pub mod credentials;
pub mod entities;
pub mod identity;
pub mod repositories;
