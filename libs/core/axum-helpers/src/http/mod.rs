//! HTTP middleware applied to every response.

pub mod security;

pub use security::security_headers;
