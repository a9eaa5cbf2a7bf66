//! Middleware for the web UI.

pub mod security;

pub use security::security_headers;
