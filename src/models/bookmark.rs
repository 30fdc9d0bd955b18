//! Bookmark model and form validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A saved link, as stored by the hosted backend.
///
/// `id`, `created_at`, and `updated_at` are assigned by the backend; this
/// server never fabricates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last-update timestamp (RFC 3339)
    pub updated_at: String,
}

/// User-submitted bookmark fields, validated before any backend call.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookmarkDraft {
    #[validate(custom(function = validate_title, message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = validate_absolute_url, message = "Enter a valid URL"))]
    pub url: String,
}

impl BookmarkDraft {
    /// Build a draft from raw form input, trimming surrounding whitespace.
    pub fn from_input(title: &str, url: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            url: url.trim().to_string(),
        }
    }
}

/// Title must contain at least one non-whitespace character.
fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title"));
    }
    Ok(())
}

/// URL must be absolute: a scheme and a host at minimum.
fn validate_absolute_url(url: &str) -> Result<(), ValidationError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| ValidationError::new("url"))?;
    if !parsed.has_host() {
        return Err(ValidationError::new("url"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft() {
        let draft = BookmarkDraft::from_input("  My favourite site  ", "https://example.com");
        assert_eq!(draft.title, "My favourite site");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_whitespace_title_rejected() {
        let draft = BookmarkDraft::from_input("   ", "https://example.com");
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(!errors.field_errors().contains_key("url"));
    }

    #[test]
    fn test_relative_url_rejected() {
        let draft = BookmarkDraft::from_input("A", "not-a-url");
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
    }

    #[test]
    fn test_hostless_url_rejected() {
        // Parses as a URL but has no host component
        let draft = BookmarkDraft::from_input("A", "mailto:someone@example.com");
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
    }
}
