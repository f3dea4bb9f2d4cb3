use crate::domain::errors::{DomainError, DomainResult};
use reqwest::Url;

/// Checks that `input` is a non-empty, absolute URL.
///
/// # Examples
///
/// ```
/// use clubapply::domain::{validate_url, DomainError};
///
/// assert!(validate_url("https://instagram.com/robotics").is_ok());
/// assert_eq!(validate_url("  "), Err(DomainError::EmptyUrl));
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(input: &str) -> DomainResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyUrl);
    }
    Url::parse(trimmed).map_err(|_| DomainError::InvalidUrl(trimmed.to_string()))
}

/// Fails with [`DomainError::RequiredField`] when `value` is blank.
pub fn require(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::RequiredField(field))
    } else {
        Ok(())
    }
}

/// Returns the trimmed value, or `None` when blank.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
