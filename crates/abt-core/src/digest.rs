//! # Scenario Digests
//!
//! A [`ScenarioDigest`] is the SHA-256 of a scenario's JSON serialization.
//! Threshold computation is a pure function of the scenario, so two reports
//! carrying the same digest must carry the same result; the digest lets a
//! reader check that without diffing configuration files.
//!
//! Field order is fixed by the struct definitions and `serde_json` prints
//! floats deterministically, so the serialization is stable for a given
//! build.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::scenario::ScenarioConfig;

/// SHA-256 digest of a serialized scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ScenarioDigest {
    /// Digest a scenario.
    pub fn of(scenario: &ScenarioConfig) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(scenario)?;
        Ok(Self {
            bytes: Sha256::digest(&bytes).into(),
        })
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ScenarioDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Preset;

    #[test]
    fn identical_scenarios_share_a_digest() {
        let a = ScenarioDigest::of(&Preset::CertainBaseline.scenario()).unwrap();
        let b = ScenarioDigest::of(&Preset::CertainBaseline.scenario()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parameter_change_changes_digest() {
        let base = Preset::CertainBaseline.scenario();
        let mut changed = base.clone();
        changed.parameters.monitoring_probability = 0.6;
        assert_ne!(
            ScenarioDigest::of(&base).unwrap(),
            ScenarioDigest::of(&changed).unwrap()
        );
    }

    #[test]
    fn hex_is_64_lowercase_chars() {
        let d = ScenarioDigest::of(&Preset::FullBaseline.scenario()).unwrap();
        let hex = d.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(d.to_string().starts_with("sha256:"));
    }
}
