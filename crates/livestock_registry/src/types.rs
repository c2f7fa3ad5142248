//! Types for the livestock registry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved principal meaning "no one". Rejected as an authority or as a
/// transfer target.
pub const DEFAULT_BURN_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// Opaque owner or authority identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    /// Create a principal from a string
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Get the principal as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Content hash identifying one animal. Computed by the caller; the registry
/// only checks that it is non-empty and unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordHash(pub String);

impl RecordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stored data for one registered animal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockRecord {
    pub breed: String,
    /// Block height of birth; never later than the height at registration
    pub birth_date: u64,
    pub description: String,
    pub owner: Principal,
    /// Inactive records are frozen and cannot change custody
    pub is_active: bool,
}

/// Execution context supplied by the driving transaction layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Acting principal
    pub caller: Principal,
    /// Current block height
    pub block_height: u64,
}

impl CallContext {
    pub fn new(caller: impl Into<String>, block_height: u64) -> Self {
        Self {
            caller: Principal::new(caller),
            block_height,
        }
    }
}

/// Fields submitted for a new registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivestockRegistration {
    pub hash: RecordHash,
    pub breed: String,
    pub birth_date: u64,
    pub description: String,
}

impl LivestockRegistration {
    pub fn new(
        hash: impl Into<String>,
        breed: impl Into<String>,
        birth_date: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            hash: RecordHash::new(hash),
            breed: breed.into(),
            birth_date,
            description: description.into(),
        }
    }
}

/// Length of a bounded text field, counted in Unicode scalar values.
pub(crate) fn text_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let record = LivestockRecord {
            breed: "Angus".into(),
            birth_date: 50,
            description: "Healthy cow".into(),
            owner: Principal::new("A"),
            is_active: true,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["birthDate"], 50);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["owner"], "A");
    }

    #[test]
    fn text_len_counts_characters_not_bytes() {
        assert_eq!(text_len("Angus"), 5);
        assert_eq!(text_len("Ñandú"), 5);
        assert!("Ñandú".len() > 5);
    }
}
