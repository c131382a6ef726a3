//! # abt-engine — Investment Threshold Engine
//!
//! Computes, for a risk-averse and possibly non-compliant firm, the fixed
//! cost of adopting a cleaner technology below which the firm prefers to
//! invest, together with its optimal actual and declared emissions under
//! each technology.
//!
//! ## Pipeline
//!
//! ```text
//! ModelParameters ──► abatement  (unconstrained optimum e* per technology)
//!                 ──► sanction   (fine schedule at e*)
//!                 ──► compliance (declared emissions r*, certain/partial)
//!                     joint      (single (e, r) plan, full uncertainty)
//!                 ──► disutility (expected power-utility disutility)
//!                 ──► threshold  (backward unit scan over investment cost)
//! ```
//!
//! Every component is a pure function of an immutable scenario. No state
//! survives a call, so repeated evaluations of the same scenario return
//! identical results.
//!
//! ## Error model
//!
//! All failures are terminal for the scenario being evaluated and surface
//! as an [`EngineError`]. The engine never substitutes a default for a
//! missing or ambiguous root.

pub mod abatement;
pub mod compliance;
pub mod disutility;
pub mod error;
pub mod joint;
pub mod sanction;
pub mod sweep;
pub mod threshold;

mod solve;

pub use abatement::{AbatementCost, OptimalEmissions, SaturatedAbatement};
pub use compliance::{ComplianceDecision, ComplianceSolver, DeclarationRegime};
pub use disutility::{expected_disutility, marginal_disutility, Outlay};
pub use error::{EngineError, Equation};
pub use joint::{ComplianceBranch, JointDecision, JointDecisionSolver, LowCostRegime, RealizedOutcome};
pub use sanction::Sanction;
pub use sweep::{linspace, sweep, SweepAxis, SweepPoint};
pub use threshold::{find_threshold, NewTechnologyOutcome, TechnologyPlan, ThresholdResult, ThresholdSearch};
