//! Configuration fingerprinting — deterministic identification of an
//! engine setup, so callers can key persisted runs and trailing state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Deterministic configuration hash (BLAKE3 over the canonical JSON form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EngineConfig {
    /// Hash of the exact configuration: two engines with the same
    /// fingerprint behave identically on the same bars.
    ///
    /// Serde serializes struct fields in declaration order, so the JSON
    /// form is canonical without extra sorting.
    pub fn fingerprint(&self) -> ConfigHash {
        let json = serde_json::to_string(self).expect("EngineConfig must serialize");
        ConfigHash::from_bytes(json.as_bytes())
    }
}
