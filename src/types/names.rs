// ABOUTME: Validated names for applications, environments and version labels.
// ABOUTME: Enforces the provider's length and character rules before any API call.

use std::fmt;
use thiserror::Error;

const MAX_APPLICATION_NAME_LEN: usize = 100;
const MIN_ENVIRONMENT_NAME_LEN: usize = 4;
const MAX_ENVIRONMENT_NAME_LEN: usize = 40;
const MAX_VERSION_LABEL_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{what} must be at least {min} characters")]
    TooShort { what: &'static str, min: usize },

    #[error("{what} exceeds maximum length of {max} characters")]
    TooLong { what: &'static str, max: usize },

    #[error("{0} cannot start or end with a hyphen")]
    EdgeHyphen(&'static str),

    #[error("invalid character in {what}: {found:?}")]
    InvalidChar { what: &'static str, found: char },
}

/// Name of an application registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationName(String);

impl ApplicationName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        check_free_text("application name", value, MAX_APPLICATION_NAME_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a deployment environment.
///
/// Environment names double as DNS prefixes, so only ASCII letters, digits and
/// hyphens are accepted and hyphens may not appear at either end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        const WHAT: &str = "environment name";

        if value.is_empty() {
            return Err(NameError::Empty(WHAT));
        }

        if value.len() < MIN_ENVIRONMENT_NAME_LEN {
            return Err(NameError::TooShort {
                what: WHAT,
                min: MIN_ENVIRONMENT_NAME_LEN,
            });
        }

        if value.len() > MAX_ENVIRONMENT_NAME_LEN {
            return Err(NameError::TooLong {
                what: WHAT,
                max: MAX_ENVIRONMENT_NAME_LEN,
            });
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(NameError::EdgeHyphen(WHAT));
        }

        if let Some(found) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(NameError::InvalidChar { what: WHAT, found });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Label identifying one application version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionLabel(String);

impl VersionLabel {
    pub fn new(value: &str) -> Result<Self, NameError> {
        check_free_text("version label", value, MAX_VERSION_LABEL_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_free_text(what: &'static str, value: &str, max: usize) -> Result<(), NameError> {
    if value.trim().is_empty() {
        return Err(NameError::Empty(what));
    }

    if value.chars().count() > max {
        return Err(NameError::TooLong { what, max });
    }

    if let Some(found) = value.chars().find(|c| c.is_control()) {
        return Err(NameError::InvalidChar { what, found });
    }

    Ok(())
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
