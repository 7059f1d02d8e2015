// ABOUTME: S3 location of an uploaded application bundle.
// ABOUTME: Validates bucket and key the way the provider expects them.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceBundleError {
    #[error("S3 bucket cannot be empty")]
    EmptyBucket,

    #[error("S3 bucket cannot contain / characters, use the S3 object key for folders")]
    BucketContainsSlash,

    #[error("S3 object key cannot be empty")]
    EmptyKey,

    #[error("S3 object key must contain only safe characters, found {0:?}")]
    UnsafeKeyChar(char),
}

/// Bucket and key of the bundle a new application version points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceBundle {
    bucket: String,
    key: String,
}

impl SourceBundle {
    pub fn new(bucket: &str, key: &str) -> Result<Self, SourceBundleError> {
        Self::validate_bucket(bucket)?;
        Self::validate_key(key)?;

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn validate_bucket(bucket: &str) -> Result<(), SourceBundleError> {
        if bucket.trim().is_empty() {
            return Err(SourceBundleError::EmptyBucket);
        }

        if bucket.contains('/') {
            return Err(SourceBundleError::BucketContainsSlash);
        }

        Ok(())
    }

    pub fn validate_key(key: &str) -> Result<(), SourceBundleError> {
        if key.trim().is_empty() {
            return Err(SourceBundleError::EmptyKey);
        }

        match key.chars().find(|c| !is_safe_key_char(*c)) {
            Some(c) => Err(SourceBundleError::UnsafeKeyChar(c)),
            None => Ok(()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// S3 "safe characters" for object keys.
fn is_safe_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '!' | '-' | '.' | '*' | '\'' | '(' | ')' | '/' | ',' | ':'
        )
}

impl fmt::Display for SourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
