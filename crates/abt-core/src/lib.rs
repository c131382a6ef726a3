#![deny(missing_docs)]

//! # abt-core — Foundational Types for the Abatement-Threshold Engine
//!
//! This crate defines the value records every other crate in the workspace
//! consumes. It has no internal crate dependencies and contains no solver
//! code — only `serde`, `serde_json`, `thiserror`, and `sha2` from the
//! external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Explicit, immutable scenario state.** A scenario is a
//!    [`ModelParameters`] record plus [`TechnologyCaps`], passed by reference
//!    into every computation. Nothing is held in process-wide variables, so a
//!    scenario evaluation is a pure function of its inputs.
//!
//! 2. **Single [`Technology`] enum.** The old technology and the three
//!    new-technology variants are one definition with exhaustive `match`.
//!
//! 3. **Validation at the boundary.** [`ModelParameters::validate`] and
//!    [`TechnologyCaps::validate`] reject out-of-domain inputs with a
//!    [`DomainError`] before any equation is evaluated.

pub mod digest;
pub mod error;
pub mod params;
pub mod scenario;
pub mod technology;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::ScenarioDigest;
pub use error::DomainError;
pub use params::ModelParameters;
pub use scenario::{Preset, ScenarioConfig, SolverSettings, UncertaintyMode};
pub use technology::{Technology, TechnologyCaps, TechnologyProfile};
