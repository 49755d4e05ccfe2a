//! HTTP service for provisioning OAuth2 issuers and resolving user info.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
