//! Token bundle and normalized user info models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Internal field holding the stable account key.
pub const USERNAME_FIELD: &str = "username";
/// Internal field holding the contact address.
pub const EMAIL_FIELD: &str = "email";

/// Tokens returned by a provider's token endpoint for one login attempt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenBundle {
    #[serde(default)]
    pub access_token: String,

    /// Identity token in compact JWT form.
    #[serde(default)]
    pub id_token: String,

    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

impl TokenBundle {
    pub fn with_id_token(id_token: impl Into<String>) -> Self {
        Self {
            access_token: String::new(),
            id_token: id_token.into(),
            token_type: None,
            expires_in: None,
            refresh_token: None,
        }
    }
}

/// Normalized user profile keyed by internal field name.
///
/// Always carries `username` and `email` entries. Only [`UserInfo::from_fields`]
/// rejects an empty email; [`UserInfo::new`] stores whatever it is given, so
/// an identity token with an empty `email` claim yields empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo(BTreeMap<String, String>);

impl UserInfo {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(USERNAME_FIELD.to_string(), username.into());
        fields.insert(EMAIL_FIELD.to_string(), email.into());
        Self(fields)
    }

    /// Builds a record from mapped fields.
    ///
    /// A missing `username` falls back to the email address. Returns the name
    /// of the first required field that is still missing.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Result<Self, &'static str> {
        let email = match fields.get(EMAIL_FIELD) {
            Some(email) if !email.is_empty() => email.clone(),
            _ => return Err(EMAIL_FIELD),
        };

        match fields.get(USERNAME_FIELD) {
            Some(username) if !username.is_empty() => {}
            _ => {
                fields.insert(USERNAME_FIELD.to_string(), email);
            }
        }

        Ok(Self(fields))
    }

    pub fn username(&self) -> &str {
        self.0.get(USERNAME_FIELD).map(String::as_str).unwrap_or_default()
    }

    pub fn email(&self) -> &str {
        self.0.get(EMAIL_FIELD).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
