//! Domain models for OAuth2 issuers.

pub mod endpoint;
pub mod field_mapping;
pub mod issuer;
pub mod token;

pub use endpoint::{Endpoint, EndpointInput, EndpointRecord};
pub use field_mapping::{FieldMappingInput, FieldMappingRecord, UserFieldMapping};
pub use issuer::{CreateIssuerRequest, Issuer, ProviderDescriptor, ScopeSet, ServiceType, Visibility};
pub use token::{TokenBundle, UserInfo};
