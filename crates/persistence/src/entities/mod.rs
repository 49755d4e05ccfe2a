//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod endpoint;
pub mod issuer;
pub mod user_field_mapping;

pub use endpoint::EndpointEntity;
pub use issuer::IssuerEntity;
pub use user_field_mapping::UserFieldMappingEntity;
