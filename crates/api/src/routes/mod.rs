//! HTTP route handlers.

pub mod admin_issuers;
pub mod health;
pub mod oauth2_services;
pub mod userinfo;
