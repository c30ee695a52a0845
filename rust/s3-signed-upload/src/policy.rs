//! POST policy documents.
//!
//! A policy is a JSON document with an `expiration` and an ordered list of
//! `conditions` the storage service checks every form upload against. See
//! [Creating a POST policy].
//!
//! The base64 encoding of the serialized document is both a form field and
//! the message that gets signed, so it is produced exactly once by
//! [`PolicyDocument::encode`] and carried around as an opaque
//! [`EncodedPolicy`] from then on.
//!
//! [Creating a POST policy]: https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-HTTPPOSTConstructPolicy.html

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{Serialize, SerializeMap, SerializeTuple, Serializer};

/// A single policy condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The form field must equal the value exactly: `{"field": "value"}`.
    Exact {
        /// Form field name.
        field: String,
        /// Required value.
        value: String,
    },
    /// The form field must start with the prefix:
    /// `["starts-with", "$field", "prefix"]`.
    StartsWith {
        /// Form field name, without the leading `$`.
        field: String,
        /// Required prefix.
        prefix: String,
    },
    /// The payload size must lie within the inclusive range:
    /// `["content-length-range", min, max]`.
    ContentLengthRange {
        /// Minimum size in bytes.
        min: u64,
        /// Maximum size in bytes.
        max: u64,
    },
}

impl Condition {
    /// Exact match condition.
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Prefix match condition.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    /// Payload size condition.
    pub fn content_length_range(min: u64, max: u64) -> Self {
        Self::ContentLengthRange { min, max }
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Exact { field, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, value)?;
                map.end()
            }
            Self::StartsWith { field, prefix } => {
                let mut tuple = serializer.serialize_tuple(3)?;
                tuple.serialize_element("starts-with")?;
                tuple.serialize_element(&format!("${}", field))?;
                tuple.serialize_element(prefix)?;
                tuple.end()
            }
            Self::ContentLengthRange { min, max } => {
                let mut tuple = serializer.serialize_tuple(3)?;
                tuple.serialize_element("content-length-range")?;
                tuple.serialize_element(min)?;
                tuple.serialize_element(max)?;
                tuple.end()
            }
        }
    }
}

/// A POST policy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    expiration: String,
    conditions: Vec<Condition>,
}

impl PolicyDocument {
    /// Create an empty policy expiring at `expiration`
    /// (`YYYY-MM-DDThh:mm:ss.sssZ`).
    pub fn new(expiration: impl Into<String>) -> Self {
        Self {
            expiration: expiration.into(),
            conditions: Vec::new(),
        }
    }

    /// Append a condition. Conditions serialize in insertion order.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Serialize to compact JSON and base64 encode (standard alphabet, padded).
    pub fn encode(&self) -> Result<EncodedPolicy, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(EncodedPolicy(STANDARD.encode(json)))
    }
}

impl Serialize for PolicyDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("expiration", &self.expiration)?;
        map.serialize_entry("conditions", &self.conditions)?;
        map.end()
    }
}

/// The base64 encoded policy. This exact string is what gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPolicy(String);

impl EncodedPolicy {
    /// Get the encoded policy.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the bytes to sign.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Take the encoded string.
    pub fn into_string(self) -> String {
        self.0
    }
}
