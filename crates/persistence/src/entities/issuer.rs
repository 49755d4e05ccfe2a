//! OAuth2 issuer entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Issuer, ScopeSet, ServiceType, Visibility};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the oauth2_issuers table.
#[derive(Debug, Clone, FromRow)]
pub struct IssuerEntity {
    pub id: Uuid,
    pub name: String,
    pub icon_url: String,
    pub base_url: String,
    pub login_scopes: String,
    pub login_scopes_offline: String,
    pub visibility: i16,
    pub service_type: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<IssuerEntity> for Issuer {
    type Error = sqlx::Error;

    fn try_from(entity: IssuerEntity) -> Result<Self, Self::Error> {
        let visibility = Visibility::from_code(entity.visibility).ok_or_else(|| {
            sqlx::Error::Decode(format!("invalid visibility code: {}", entity.visibility).into())
        })?;
        let service_type = entity
            .service_type
            .parse::<ServiceType>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            icon_url: entity.icon_url,
            base_url: entity.base_url,
            login_scopes: ScopeSet::parse(&entity.login_scopes),
            login_scopes_offline: ScopeSet::parse(&entity.login_scopes_offline),
            visibility,
            service_type,
            enabled: entity.enabled,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> IssuerEntity {
        IssuerEntity {
            id: Uuid::new_v4(),
            name: "Apple".to_string(),
            icon_url: String::new(),
            base_url: String::new(),
            login_scopes: "public_profile email".to_string(),
            login_scopes_offline: "public_profile email".to_string(),
            visibility: 1,
            service_type: "apple".to_string(),
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_entity_into_issuer() {
        let issuer = Issuer::try_from(entity()).unwrap();
        assert_eq!(issuer.visibility, Visibility::Everywhere);
        assert_eq!(issuer.service_type, ServiceType::Apple);
        assert!(issuer.login_scopes.contains("email"));
    }

    #[test]
    fn test_entity_with_bad_visibility_fails() {
        let mut bad = entity();
        bad.visibility = 9;
        assert!(Issuer::try_from(bad).is_err());
    }

    #[test]
    fn test_entity_with_unknown_service_type_fails() {
        let mut bad = entity();
        bad.service_type = "facebook".to_string();
        assert!(Issuer::try_from(bad).is_err());
    }
}
