//! Upload request descriptor.
//!
//! An [`UploadRequest`] carries everything needed to sign a POST policy:
//! credentials, the target bucket, and the constraints the storage service
//! will enforce on the uploaded object.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use zeroize::Zeroize;

use crate::ValidationError;

/// Inputs of an [`UploadRequest`], in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// AWS region used in the credential scope.
    Region,
    /// AWS Access Key ID.
    AccessKeyId,
    /// AWS Secret Access Key.
    SecretAccessKey,
    /// Target bucket.
    Bucket,
    /// Required object key prefix.
    StartsWithKey,
    /// Upper bound on the payload size.
    MaxFileSize,
    /// Validity window of the policy.
    Expiration,
}

impl Field {
    /// Human readable name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::AccessKeyId => "access key id",
            Self::SecretAccessKey => "secret access key",
            Self::Bucket => "bucket",
            Self::StartsWithKey => "starts with key",
            Self::MaxFileSize => "max file size",
            Self::Expiration => "expiration",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AWS Secret Access Key.
///
/// Never printed by `Debug` and wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretAccessKey(String);

impl SecretAccessKey {
    /// Wrap a secret key.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SecretAccessKey {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for SecretAccessKey {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for SecretAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretAccessKey(..)")
    }
}

impl Drop for SecretAccessKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Deserialization helper for UploadRequest.
#[derive(Deserialize)]
struct UploadRequestSerde {
    region: String,
    access_key_id: String,
    secret_access_key: SecretAccessKey,
    bucket: String,
    starts_with_key: String,
    max_file_size_bytes: u64,
    /// Seconds.
    expires_in: u64,
}

/// A fully specified request to sign a browser upload.
///
/// Construction never fails; missing inputs are reported when the request is
/// signed, see [`UploadRequest::validate`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use s3_signed_upload::UploadRequest;
///
/// let request = UploadRequest::new("us-east-1", "AKIDEXAMPLE", "secret", "my-bucket")
///     .with_starts_with_key("uploads/")
///     .with_max_file_size(10 * 1024 * 1024)
///     .with_expiration(Duration::from_secs(15 * 60));
///
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    region: String,
    access_key_id: String,
    secret_access_key: SecretAccessKey,
    bucket: String,
    starts_with_key: String,
    max_file_size: u64,
    expiration: Duration,
}

impl<'de> Deserialize<'de> for UploadRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = UploadRequestSerde::deserialize(deserializer)?;
        Ok(UploadRequest::new(
            helper.region,
            helper.access_key_id,
            helper.secret_access_key,
            helper.bucket,
        )
        .with_starts_with_key(helper.starts_with_key)
        .with_max_file_size(helper.max_file_size_bytes)
        .with_expiration(Duration::from_secs(helper.expires_in)))
    }
}

impl UploadRequest {
    /// Create a request for the given credentials and bucket.
    ///
    /// The key prefix, size limit and expiration start out empty and must be
    /// set before signing.
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<SecretAccessKey>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
            starts_with_key: String::new(),
            max_file_size: 0,
            expiration: Duration::ZERO,
        }
    }

    /// Require uploaded object keys to start with `prefix`.
    pub fn with_starts_with_key(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with_key = prefix.into();
        self
    }

    /// Limit the payload to at most `bytes`.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Keep the policy valid for `expiration` after signing.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Get the region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub(crate) fn secret_access_key(&self) -> &SecretAccessKey {
        &self.secret_access_key
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the required key prefix.
    pub fn starts_with_key(&self) -> &str {
        &self.starts_with_key
    }

    /// Get the maximum payload size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Get the policy validity window.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Check that every field is set, reporting the first one that is not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = [
            (Field::Region, self.region.is_empty()),
            (Field::AccessKeyId, self.access_key_id.is_empty()),
            (Field::SecretAccessKey, self.secret_access_key.is_empty()),
            (Field::Bucket, self.bucket.is_empty()),
            (Field::StartsWithKey, self.starts_with_key.is_empty()),
            (Field::MaxFileSize, self.max_file_size == 0),
            (Field::Expiration, self.expiration.is_zero()),
        ];

        match missing.into_iter().find(|(_, missing)| *missing) {
            Some((field, _)) => Err(ValidationError::MissingField(field)),
            None => Ok(()),
        }
    }
}
