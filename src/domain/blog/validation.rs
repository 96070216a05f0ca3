//! Blog field validation

use thiserror::Error;

/// Errors that can occur while validating blog fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlogValidationError {
    #[error("Blog validation failed: title is required")]
    MissingTitle,

    #[error("Blog validation failed: url is required")]
    MissingUrl,

    #[error("Blog validation failed: likes must be a non-negative integer, got {0}")]
    NegativeLikes(i64),
}

/// Validate a required title, rejecting absent or blank values
pub fn validate_title(title: Option<&str>) -> Result<&str, BlogValidationError> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(BlogValidationError::MissingTitle),
    }
}

/// Validate a required url, rejecting absent or blank values
pub fn validate_url(url: Option<&str>) -> Result<&str, BlogValidationError> {
    match url {
        Some(u) if !u.trim().is_empty() => Ok(u),
        _ => Err(BlogValidationError::MissingUrl),
    }
}

/// Validate a like count
pub fn validate_likes(likes: i64) -> Result<u64, BlogValidationError> {
    u64::try_from(likes).map_err(|_| BlogValidationError::NegativeLikes(likes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_present() {
        assert_eq!(validate_title(Some("Type wars")), Ok("Type wars"));
    }

    #[test]
    fn test_title_missing_or_blank() {
        assert_eq!(validate_title(None), Err(BlogValidationError::MissingTitle));
        assert_eq!(validate_title(Some("")), Err(BlogValidationError::MissingTitle));
        assert_eq!(
            validate_title(Some("   ")),
            Err(BlogValidationError::MissingTitle)
        );
    }

    #[test]
    fn test_url_missing() {
        assert_eq!(validate_url(None), Err(BlogValidationError::MissingUrl));
        assert_eq!(validate_url(Some("")), Err(BlogValidationError::MissingUrl));
    }

    #[test]
    fn test_likes() {
        assert_eq!(validate_likes(0), Ok(0));
        assert_eq!(validate_likes(9001), Ok(9001));
        assert_eq!(
            validate_likes(-1),
            Err(BlogValidationError::NegativeLikes(-1))
        );
    }
}
