use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do when a created slot collides with an existing one at the
/// same (doctor, date, time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSlotPolicy {
    /// Accept the new slot alongside the existing one.
    Allow,
    /// Keep the existing slot and silently skip the new one.
    Merge,
    /// Fail the whole request, listing the collisions.
    Reject,
}

impl DuplicateSlotPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "allow" => Some(Self::Allow),
            "merge" => Some(Self::Merge),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for DuplicateSlotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Merge => write!(f, "merge"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub duplicate_slot_policy: DuplicateSlotPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT is not a valid port number, using 3000");
                3000
            }),
            Err(_) => 3000,
        };

        let duplicate_slot_policy = match env::var("SLOT_DUPLICATE_POLICY") {
            Ok(raw) => DuplicateSlotPolicy::parse(&raw).unwrap_or_else(|| {
                warn!(
                    "SLOT_DUPLICATE_POLICY '{}' not recognized (allow|merge|reject), using allow",
                    raw
                );
                DuplicateSlotPolicy::Allow
            }),
            Err(_) => DuplicateSlotPolicy::Allow,
        };

        Self {
            port,
            duplicate_slot_policy,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            duplicate_slot_policy: DuplicateSlotPolicy::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_policies() {
        assert_eq!(DuplicateSlotPolicy::parse("allow"), Some(DuplicateSlotPolicy::Allow));
        assert_eq!(DuplicateSlotPolicy::parse("MERGE"), Some(DuplicateSlotPolicy::Merge));
        assert_eq!(DuplicateSlotPolicy::parse("reject"), Some(DuplicateSlotPolicy::Reject));
        assert_eq!(DuplicateSlotPolicy::parse("dedupe"), None);
    }
}
