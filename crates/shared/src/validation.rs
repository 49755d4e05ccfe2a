//! Common validation utilities.

use validator::{ValidateUrl, ValidationError};

/// Validates an endpoint URL.
///
/// An empty string is accepted: it marks an endpoint that exists but must not
/// be called over the network.
pub fn validate_endpoint_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }

    if url.validate_url() && (url.starts_with("https://") || url.starts_with("http://")) {
        Ok(())
    } else {
        let mut err = ValidationError::new("endpoint_url");
        err.message = Some("Endpoint URL must be empty or an absolute http(s) URL".into());
        Err(err)
    }
}

/// Validates an optional icon URL.
pub fn validate_icon_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || (url.starts_with("https://") && url.validate_url()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("icon_url");
        err.message = Some("Icon URL must be an absolute https URL".into());
        Err(err)
    }
}

/// Validates a space-separated scope list.
///
/// Scope tokens follow RFC 6749 section 3.3: printable ASCII except
/// space, `"` and `\`.
pub fn validate_scope_list(scopes: &str) -> Result<(), ValidationError> {
    let valid = scopes.split_whitespace().all(|scope| {
        scope
            .bytes()
            .all(|b| b == 0x21 || (0x23..=0x5B).contains(&b) || (0x5D..=0x7E).contains(&b))
    });

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("scope_list");
        err.message = Some("Scopes must be space-separated printable ASCII tokens".into());
        Err(err)
    }
}
