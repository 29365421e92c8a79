//! Identity wrappers for the organization, repositories, and credentials
//! used when addressing the hosting API.

use std::fmt;

use url::Url;

use crate::error::SigCheckError;

/// Default API base for Gitee's v5 REST API.
pub const DEFAULT_API_BASE: &str = "https://gitee.com/api/v5";

/// Returns true when `value` can be placed in a single URL path segment
/// without escaping.
fn is_path_safe(value: &str) -> bool {
    const fn is_allowed(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')
    }

    !value.is_empty() && value != "." && value != ".." && value.chars().all(is_allowed)
}

/// Organization (namespace) wrapper that owns the checked repositories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validates the organization name.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::InvalidOrganizationName`] when the name is
    /// empty or contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(value: &str) -> Result<Self, SigCheckError> {
        let trimmed = value.trim();
        if !is_path_safe(trimmed) {
            return Err(SigCheckError::InvalidOrganizationName {
                name: value.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the organization value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrganizationName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Repository name as referenced from a SIG file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates the repository name.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::InvalidRepositoryName`] when the name is
    /// empty or contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(value: &str) -> Result<Self, SigCheckError> {
        let trimmed = value.trim();
        if !is_path_safe(trimmed) {
            return Err(SigCheckError::InvalidRepositoryName {
                name: value.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `SigCheckError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, SigCheckError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SigCheckError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AccessToken(***)")
    }
}

/// Parsed API base URL, e.g. `https://gitee.com/api/v5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses an absolute HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::InvalidUrl`] when the value is not a valid
    /// `http` or `https` URL.
    pub fn parse(value: &str) -> Result<Self, SigCheckError> {
        let url = Url::parse(value.trim())
            .map_err(|error| SigCheckError::InvalidUrl(format!("{value}: {error}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SigCheckError::InvalidUrl(format!(
                "{value}: scheme must be http or https"
            )));
        }
        Ok(Self(url))
    }

    /// Borrow the URL as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Returns the API path for a single repository.
#[must_use]
pub fn repository_path(organization: &OrganizationName, repository: &RepositoryName) -> String {
    format!("/repos/{organization}/{repository}")
}
