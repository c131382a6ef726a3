//! # Technologies — Single Source of Truth
//!
//! Defines the [`Technology`] enum with the four technology variants the
//! model compares, and [`TechnologyCaps`], the efficiency caps that
//! parameterize their abatement-cost curves.
//!
//! A cap `c` fixes the abatement cost curve `(c - e) * e`. Lower caps mean a
//! more efficient technology: the documented parametrization uses 100 for the
//! old technology, 50 for a new technology of known efficiency, and 75/25
//! for the high-cost and low-cost realizations of an uncertain one.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A technology variant the firm may operate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// The incumbent, dirtier technology. Never carries an investment cost.
    Old,
    /// A new technology whose efficiency is known in advance.
    New,
    /// The high-cost (less efficient) realization of an uncertain new technology.
    NewHighCost,
    /// The low-cost (more efficient) realization of an uncertain new technology.
    NewLowCost,
}

impl Technology {
    /// Return all technology variants.
    pub fn all() -> &'static [Technology] {
        &[Self::Old, Self::New, Self::NewHighCost, Self::NewLowCost]
    }

    /// Short label used in reports (`o`, `n`, `nh`, `nl`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Old => "o",
            Self::New => "n",
            Self::NewHighCost => "nh",
            Self::NewLowCost => "nl",
        }
    }

    /// Whether adopting this technology requires paying the investment cost.
    pub fn requires_investment(&self) -> bool {
        !matches!(self, Self::Old)
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Old => "old",
            Self::New => "new",
            Self::NewHighCost => "new_high_cost",
            Self::NewLowCost => "new_low_cost",
        };
        write!(f, "{s}")
    }
}

/// A technology together with its efficiency cap.
///
/// Constructed once per scenario from [`TechnologyCaps`] and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnologyProfile {
    /// Which technology this profile describes.
    pub technology: Technology,
    /// Efficiency cap of the abatement cost curve.
    pub cap: f64,
}

impl TechnologyProfile {
    /// Create a profile.
    pub fn new(technology: Technology, cap: f64) -> Self {
        Self { technology, cap }
    }
}

fn default_old() -> f64 {
    100.0
}
fn default_new() -> f64 {
    50.0
}
fn default_new_high() -> f64 {
    75.0
}
fn default_new_low() -> f64 {
    25.0
}

/// Efficiency caps for every technology variant in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnologyCaps {
    /// Cap of the old technology.
    #[serde(default = "default_old")]
    pub old: f64,
    /// Cap of the new technology when its efficiency is certain.
    #[serde(default = "default_new")]
    pub new: f64,
    /// Cap of the high-cost realization. Also the upper emissions bound
    /// of the joint decision under full uncertainty.
    #[serde(default = "default_new_high")]
    pub new_high: f64,
    /// Cap of the low-cost realization. Also the boundary of the
    /// within/exceeds sub-branch under full uncertainty.
    #[serde(default = "default_new_low")]
    pub new_low: f64,
}

impl Default for TechnologyCaps {
    fn default() -> Self {
        Self {
            old: default_old(),
            new: default_new(),
            new_high: default_new_high(),
            new_low: default_new_low(),
        }
    }
}

impl TechnologyCaps {
    /// The profile for `technology` under these caps.
    pub fn profile(&self, technology: Technology) -> TechnologyProfile {
        let cap = match technology {
            Technology::Old => self.old,
            Technology::New => self.new,
            Technology::NewHighCost => self.new_high,
            Technology::NewLowCost => self.new_low,
        };
        TechnologyProfile::new(technology, cap)
    }

    /// Reject non-positive caps and a low-cost cap above the high-cost one.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("caps.old", self.old),
            ("caps.new", self.new),
            ("caps.new_high", self.new_high),
            ("caps.new_low", self.new_low),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::InvalidParameter {
                    name,
                    value,
                    expected: "cap > 0",
                });
            }
        }
        if self.new_low > self.new_high {
            return Err(DomainError::InconsistentCaps(format!(
                "new_low {} exceeds new_high {}",
                self.new_low, self.new_high
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_four_variants() {
        assert_eq!(Technology::all().len(), 4);
    }

    #[test]
    fn only_old_is_investment_free() {
        for t in Technology::all() {
            assert_eq!(t.requires_investment(), *t != Technology::Old);
        }
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            Technology::all().iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(Technology::NewLowCost.to_string(), "new_low_cost");
        assert_eq!(Technology::Old.to_string(), "old");
    }

    #[test]
    fn default_caps_match_documented_parametrization() {
        let caps = TechnologyCaps::default();
        assert_eq!(caps.profile(Technology::Old).cap, 100.0);
        assert_eq!(caps.profile(Technology::New).cap, 50.0);
        assert_eq!(caps.profile(Technology::NewHighCost).cap, 75.0);
        assert_eq!(caps.profile(Technology::NewLowCost).cap, 25.0);
        assert!(caps.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_cap() {
        let caps = TechnologyCaps {
            new: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            caps.validate(),
            Err(DomainError::InvalidParameter {
                name: "caps.new",
                ..
            })
        ));
    }

    #[test]
    fn rejects_low_cap_above_high_cap() {
        let caps = TechnologyCaps {
            new_low: 80.0,
            ..Default::default()
        };
        assert!(matches!(
            caps.validate(),
            Err(DomainError::InconsistentCaps(_))
        ));
    }

    #[test]
    fn caps_deserialize_with_partial_fields() {
        let caps: TechnologyCaps = serde_json::from_str(r#"{"new": 40}"#).unwrap();
        assert_eq!(caps.new, 40.0);
        assert_eq!(caps.old, 100.0);
    }

    #[test]
    fn technology_serde_snake_case() {
        let json = serde_json::to_string(&Technology::NewHighCost).unwrap();
        assert_eq!(json, "\"new_high_cost\"");
    }
}
