//! Resolves a token bundle into user info for a stored issuer.

use domain::models::{FieldMappingRecord, TokenBundle, UserInfo};
use domain::services::{user_info_from_profile, UserInfoStrategy};

use crate::error::ApiError;
use crate::services::remote_userinfo::RemoteUserInfoClient;

/// Runs the issuer's user info strategy.
///
/// Local extraction never touches the network. Remote resolution calls the
/// userinfo endpoint and maps the profile through the issuer's mappings.
pub async fn resolve_user_info(
    strategy: &UserInfoStrategy,
    bundle: &TokenBundle,
    mappings: &[FieldMappingRecord],
    client: &RemoteUserInfoClient,
) -> Result<UserInfo, ApiError> {
    match strategy {
        UserInfoStrategy::LocalToken(extract) => Ok(extract(bundle)?),
        UserInfoStrategy::Remote { url } => {
            if bundle.access_token.is_empty() {
                return Err(ApiError::Validation("access_token is required".into()));
            }
            let raw = client.fetch_profile(url, &bundle.access_token).await?;
            Ok(user_info_from_profile(&raw, mappings)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::apple;

    fn client() -> RemoteUserInfoClient {
        RemoteUserInfoClient::new(1000).unwrap()
    }

    #[tokio::test]
    async fn test_local_strategy_uses_identity_token() {
        let strategy = UserInfoStrategy::LocalToken(apple::extract_user_info);
        let bundle = TokenBundle::with_id_token("header.eyJlbWFpbCI6ImpvaG5AZXhhbXBsZS5jb20ifQ.sig");

        let info = resolve_user_info(&strategy, &bundle, &[], &client())
            .await
            .unwrap();
        assert_eq!(info.username(), "john@example.com");
    }

    #[tokio::test]
    async fn test_local_strategy_failure_is_unauthorized() {
        let strategy = UserInfoStrategy::LocalToken(apple::extract_user_info);
        let bundle = TokenBundle::with_id_token("onlyonesegment");

        let result = resolve_user_info(&strategy, &bundle, &[], &client()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_remote_strategy_requires_access_token() {
        let strategy = UserInfoStrategy::Remote {
            url: "http://127.0.0.1:9/userinfo".to_string(),
        };
        let bundle = TokenBundle::with_id_token("a.b.c");

        let result = resolve_user_info(&strategy, &bundle, &[], &client()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
