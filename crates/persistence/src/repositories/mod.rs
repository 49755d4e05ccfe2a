//! Repository implementations for database operations.

pub mod endpoint;
pub mod issuer;
pub mod user_field_mapping;

pub use endpoint::EndpointRepository;
pub use issuer::IssuerRepository;
pub use user_field_mapping::UserFieldMappingRepository;
