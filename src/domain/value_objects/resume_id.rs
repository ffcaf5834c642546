use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const PENDING_PREFIX: &str = "temp-";

/// Locally generated identifier for an entity awaiting server confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingToken {
    millis: i64,
    nonce: String,
}

impl PendingToken {
    pub fn generate() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        Self {
            millis: Utc::now().timestamp_millis(),
            nonce,
        }
    }
}

impl fmt::Display for PendingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", PENDING_PREFIX, self.millis, self.nonce)
    }
}

/// Resume identifier. Server-assigned ids are `Confirmed`; entities written
/// optimistically before the server has answered carry a `Pending` token, so
/// "is this optimistic" is visible in the type rather than a string prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResumeId {
    Confirmed(String),
    Pending(PendingToken),
}

impl ResumeId {
    pub fn confirmed(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Resume ID cannot be empty".to_string());
        }
        if value.starts_with(PENDING_PREFIX) {
            return Err("Confirmed resume ID cannot use the pending prefix".to_string());
        }
        Ok(Self::Confirmed(value))
    }

    pub fn pending() -> Self {
        Self::Pending(PendingToken::generate())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        if let Some(rest) = value.strip_prefix(PENDING_PREFIX) {
            let (millis, nonce) = rest
                .split_once('-')
                .ok_or_else(|| format!("Malformed pending resume ID: {value}"))?;
            let millis = millis
                .parse::<i64>()
                .map_err(|_| format!("Malformed pending resume ID: {value}"))?;
            if nonce.is_empty() {
                return Err(format!("Malformed pending resume ID: {value}"));
            }
            return Ok(Self::Pending(PendingToken {
                millis,
                nonce: nonce.to_string(),
            }));
        }
        Self::confirmed(value)
    }
}

// Display writes the same string form `parse` accepts, so queue rows
// round-trip through SQLite unchanged.
impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeId::Confirmed(value) => write!(f, "{}", value),
            ResumeId::Pending(token) => write!(f, "{}", token),
        }
    }
}

impl Serialize for ResumeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ResumeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_rejects_empty_and_pending_prefix() {
        assert!(ResumeId::confirmed("  ").is_err());
        assert!(ResumeId::confirmed("temp-123-abc").is_err());
        assert!(ResumeId::confirmed("resume-42").is_ok());
    }

    #[test]
    fn pending_round_trips_through_string_form() {
        let id = ResumeId::pending();
        let parsed = ResumeId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(parsed.is_pending());
    }

    #[test]
    fn serde_uses_string_form() {
        let id = ResumeId::confirmed("abc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: ResumeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
