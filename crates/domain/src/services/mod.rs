//! Domain services for OAuth2 issuers.
//!
//! Services contain business logic that operates on domain models.

pub mod apple;
pub mod provisioning;
pub mod registry;
pub mod userinfo;

pub use provisioning::{
    provision_issuer, InMemoryIssuerStore, IssuerStore, ProvisionError, ProvisionedIssuer,
    StoreError,
};
pub use registry::{default_registry, ProviderHooks, ProviderRegistry};
pub use userinfo::{
    map_user_fields, select_strategy, user_info_from_profile, ExtractUserInfoFn,
    ExtractionError, UserInfoStrategy,
};
