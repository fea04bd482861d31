//! Credential collaborator implementations.

mod hmac_credentials;

pub use hmac_credentials::HmacCredentials;
