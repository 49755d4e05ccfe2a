//! Shared utilities for the Apple Sign-In issuer service.
//!
//! This crate provides common functionality used across all other crates:
//! - Compact JWT inspection (payload decoding without verification)
//! - Admin API key hashing
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod validation;
