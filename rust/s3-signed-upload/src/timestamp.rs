//! Timestamp renderings used by the POST policy.

use chrono::{DateTime, Utc};

#[cfg(not(target_arch = "wasm32"))]
use std::time::SystemTime;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, web::SystemTimeExt};

/// Policy `expiration` format, millisecond precision.
const POLICY_EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
/// Credential scope date.
const SCOPE_DATE_FORMAT: &str = "%Y%m%d";
/// `x-amz-date` format. Milliseconds follow the seconds with no separator.
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%S%3fZ";

/// The expiry instant of a policy, rendered in each format the policy needs.
///
/// All three strings are derived from the same UTC instant so they always
/// agree with one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTime {
    policy_expiration: String,
    scope_date: String,
    amz_date: String,
}

impl SigningTime {
    /// Render the given instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            policy_expiration: instant.format(POLICY_EXPIRATION_FORMAT).to_string(),
            scope_date: instant.format(SCOPE_DATE_FORMAT).to_string(),
            amz_date: instant.format(AMZ_DATE_FORMAT).to_string(),
        }
    }

    /// `YYYY-MM-DDThh:mm:ss.sssZ`
    pub fn policy_expiration(&self) -> &str {
        &self.policy_expiration
    }

    /// `YYYYMMDD`
    pub fn scope_date(&self) -> &str {
        &self.scope_date
    }

    /// `YYYYMMDDThhmmssmmmZ`
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }
}

/// Get the current time as a UTC datetime.
pub fn current_time() -> DateTime<Utc> {
    #[cfg(not(target_arch = "wasm32"))]
    let now = SystemTime::now();
    #[cfg(target_arch = "wasm32")]
    let now = SystemTime::now().to_std();

    DateTime::<Utc>::from(now)
}
