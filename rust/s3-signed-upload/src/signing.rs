//! AWS Signature Version 4 key derivation and signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

use crate::SecretAccessKey;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service component of the credential scope.
pub const SERVICE: &str = "s3";

/// Terminator of the credential scope.
const TERMINATOR: &str = "aws4_request";

/// Credential scope bound to an access key:
/// `{access_key_id}/{date}/{region}/{service}/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope(String);

impl CredentialScope {
    /// Build a scope for the given access key, `YYYYMMDD` date, region and service.
    pub fn new(access_key_id: &str, date: &str, region: &str, service: &str) -> Self {
        Self(format!(
            "{}/{}/{}/{}/{}",
            access_key_id, date, region, service, TERMINATOR
        ))
    }

    /// Get the scope string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS SigV4 signing key derived from a secret.
///
/// The key is derived through an HMAC chain:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
///
/// Intermediate keys are wiped once derivation returns, and the
/// final key is wiped on drop.
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Derive a signing key for the given date, region, and service.
    pub fn derive(secret: &SecretAccessKey, date: &str, region: &str, service: &str) -> Self {
        let k_date = Self::hmac(Self::prefixed(secret).as_bytes(), date.as_bytes());
        let k_region = Self::hmac(&k_date, region.as_bytes());
        let k_service = Self::hmac(&k_region, service.as_bytes());
        Self(Self::hmac(&k_service, TERMINATOR.as_bytes()))
    }

    /// `"AWS4" + secret`, allocated once so no unwiped copy is left behind.
    fn prefixed(secret: &SecretAccessKey) -> Zeroizing<String> {
        let secret = secret.expose();
        let mut prefixed = Zeroizing::new(String::with_capacity(4 + secret.len()));
        prefixed.push_str("AWS4");
        prefixed.push_str(secret);
        prefixed
    }

    /// Compute HMAC-SHA256.
    fn hmac(key: &[u8], data: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any size");
        mac.update(data);
        Zeroizing::new(mac.finalize().into_bytes().to_vec())
    }

    /// Sign a message with this key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(Self::hmac(&self.0, message).to_vec())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// AWS SigV4 signature. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Lowercase hex of the derived key, test only.
    fn key_hex(key: &SigningKey) -> String {
        Signature(key.0.to_vec()).to_string()
    }

    #[test]
    fn it_derives_the_published_aws_signing_key() {
        // https://docs.aws.amazon.com/general/latest/gr/signature-v4-examples.html
        let secret = SecretAccessKey::new("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        let key = SigningKey::derive(&secret, "20120215", "us-east-1", "iam");

        assert_eq!(
            key_hex(&key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn it_scopes_keys_by_date_region_and_service() {
        let secret = SecretAccessKey::new("secret1");
        let base = key_hex(&SigningKey::derive(&secret, "20240101", "us-east-1", SERVICE));

        assert_ne!(
            base,
            key_hex(&SigningKey::derive(&secret, "20240102", "us-east-1", SERVICE))
        );
        assert_ne!(
            base,
            key_hex(&SigningKey::derive(&secret, "20240101", "eu-west-1", SERVICE))
        );
        assert_ne!(
            base,
            key_hex(&SigningKey::derive(&secret, "20240101", "us-east-1", "iam"))
        );
    }

    #[test]
    fn it_formats_signatures_as_lowercase_hex() {
        let key = SigningKey::derive(&SecretAccessKey::new("secret1"), "20240101", "us-east-1", SERVICE);
        let signature = key.sign(b"policy").to_string();

        assert_eq!(signature.len(), 64);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
        assert_eq!(signature, key.sign(b"policy").to_string());
        assert_ne!(signature, key.sign(b"policy!").to_string());
    }

    #[test]
    fn it_builds_credential_scopes() {
        let scope = CredentialScope::new("AKIDEXAMPLE", "20240101", "us-east-1", SERVICE);
        assert_eq!(scope.as_str(), "AKIDEXAMPLE/20240101/us-east-1/s3/aws4_request");
    }

    #[test]
    fn it_prefixes_the_secret_in_a_single_allocation() {
        let secret = SecretAccessKey::new("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
        let prefixed = SigningKey::prefixed(&secret);

        assert_eq!(
            prefixed.as_str(),
            "AWS4wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"
        );
        assert_eq!(prefixed.capacity(), prefixed.len());
    }

    #[test]
    fn it_redacts_signing_keys() {
        let key = SigningKey::derive(&SecretAccessKey::new("secret1"), "20240101", "us-east-1", SERVICE);
        assert_eq!(format!("{:?}", key), "SigningKey(..)");
    }
}
