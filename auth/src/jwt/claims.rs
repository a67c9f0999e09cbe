use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by access tokens.
///
/// The subject is the only claim the service relies on. `exp` is optional:
/// tokens issued without it stay valid until the signing secret is rotated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated subject.
    ///
    /// # Arguments
    /// * `subject` - Identifier of the authenticated user
    /// * `expiration_hours` - Token lifetime; `None` issues a token without `exp`
    ///
    /// # Returns
    /// Claims with `sub` and `iat` set, and `exp` when a lifetime is given
    pub fn for_subject(subject: impl ToString, expiration_hours: Option<i64>) -> Self {
        let now = Utc::now();

        Self {
            sub: Some(subject.to_string()),
            iat: Some(now.timestamp()),
            exp: expiration_hours.map(|hours| (now + Duration::hours(hours)).timestamp()),
        }
    }

    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Check if the token is expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.is_some_and(|exp| exp < current_timestamp)
    }
}
