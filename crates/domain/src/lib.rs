//! Domain layer for the Apple Sign-In issuer service.
//!
//! This crate contains:
//! - Domain models (issuers, endpoints, field mappings, tokens)
//! - Provider builders, the provider registry and user info resolution
//! - Domain error types

pub mod models;
pub mod services;
