//! POST policy signer.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{Condition, PolicyDocument};
use crate::signing::{ALGORITHM, CredentialScope, SERVICE, SigningKey};
use crate::timestamp::{SigningTime, current_time};
use crate::{SignError, UploadRequest};

/// Canned ACL applied to every upload.
pub const ACL: &str = "private";

/// Last year that fits the four digit year of the policy timestamps.
const MAX_YEAR: i32 = 9999;

/// Signs browser upload policies.
///
/// The signer holds no state: each call works only on its own inputs and
/// never keeps the secret key around after returning.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use chrono::{TimeZone, Utc};
/// use s3_signed_upload::{PolicySigner, UploadRequest};
///
/// let request = UploadRequest::new("us-east-1", "AKIDEXAMPLE", "secret1", "my-bucket")
///     .with_starts_with_key("uploads/")
///     .with_max_file_size(10 * 1024 * 1024)
///     .with_expiration(Duration::from_secs(15 * 60));
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let upload = PolicySigner.sign(&request, now).unwrap();
///
/// assert_eq!(upload.url, "https://my-bucket.s3.amazonaws.com");
/// assert_eq!(upload.credential, "AKIDEXAMPLE/20240101/us-east-1/s3/aws4_request");
/// assert_eq!(upload.date, "20240101T001500000Z");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicySigner;

impl PolicySigner {
    /// Sign an upload policy expiring `request.expiration()` after `now`.
    pub fn sign(
        &self,
        request: &UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<SignedUpload, SignError> {
        request.validate()?;

        let expiration =
            TimeDelta::from_std(request.expiration()).map_err(|_| SignError::ExpirationOutOfRange)?;
        let expires_at = now
            .checked_add_signed(expiration)
            .filter(|expires_at| (0..=MAX_YEAR).contains(&expires_at.year()))
            .ok_or(SignError::ExpirationOutOfRange)?;
        let time = SigningTime::new(expires_at);

        let credential = CredentialScope::new(
            request.access_key_id(),
            time.scope_date(),
            request.region(),
            SERVICE,
        );

        let policy = PolicyDocument::new(time.policy_expiration())
            .condition(Condition::exact("bucket", request.bucket()))
            .condition(Condition::starts_with("key", request.starts_with_key()))
            .condition(Condition::exact("acl", ACL))
            .condition(Condition::exact("x-amz-credential", credential.as_str()))
            .condition(Condition::exact("x-amz-algorithm", ALGORITHM))
            .condition(Condition::exact("x-amz-date", time.amz_date()))
            .condition(Condition::content_length_range(0, request.max_file_size()));

        let encoded = policy.encode()?;

        let key = SigningKey::derive(
            request.secret_access_key(),
            time.scope_date(),
            request.region(),
            SERVICE,
        );
        let signature = key.sign(encoded.as_bytes());

        tracing::debug!(
            bucket = request.bucket(),
            region = request.region(),
            credential = credential.as_str(),
            date = time.amz_date(),
            expiration = time.policy_expiration(),
            "signed upload policy"
        );

        Ok(SignedUpload {
            url: format!("https://{}.s3.amazonaws.com", request.bucket()),
            policy: encoded.into_string(),
            signature: signature.to_string(),
            date: time.amz_date().to_string(),
            credential: credential.to_string(),
            algorithm: ALGORITHM.to_string(),
            acl: ACL.to_string(),
            starts_with_key: request.starts_with_key().to_string(),
        })
    }

    /// Sign an upload policy expiring `request.expiration()` from the current
    /// wall clock time.
    pub fn sign_now(&self, request: &UploadRequest) -> Result<SignedUpload, SignError> {
        self.sign(request, current_time())
    }
}

/// A form field name and value.
pub type FormField = (&'static str, String);

/// Everything a client needs to POST a file directly to storage.
///
/// Field values are final: `policy` is the exact string that was signed and
/// must be sent as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUpload {
    /// POST target.
    pub url: String,
    /// Base64 encoded policy document, form field `policy`.
    pub policy: String,
    /// Lowercase hex signature, form field `x-amz-signature`.
    pub signature: String,
    /// Signing timestamp, form field `x-amz-date`.
    pub date: String,
    /// Credential scope, form field `x-amz-credential`.
    pub credential: String,
    /// Signing algorithm, form field `x-amz-algorithm`.
    pub algorithm: String,
    /// Canned ACL, form field `acl`.
    pub acl: String,
    /// Prefix every object key must start with.
    pub starts_with_key: String,
}

impl SignedUpload {
    /// Form fields to send, in order, with `key` as the object key.
    ///
    /// The `file` field carrying the payload goes after these.
    pub fn form_fields(&self, key: impl Into<String>) -> Vec<FormField> {
        vec![
            ("key", key.into()),
            ("acl", self.acl.clone()),
            ("x-amz-credential", self.credential.clone()),
            ("x-amz-algorithm", self.algorithm.clone()),
            ("x-amz-date", self.date.clone()),
            ("policy", self.policy.clone()),
            ("x-amz-signature", self.signature.clone()),
        ]
    }

    /// Returns true if the storage service would accept `key` under this
    /// policy's `starts-with` condition.
    pub fn accepts_key(&self, key: &str) -> bool {
        key.starts_with(&self.starts_with_key)
    }
}
