//! # abt-cli — Abatement-Threshold Command-Line Interface
//!
//! Thin shell around `abt-engine`. Parameter input and result reporting
//! live here; every computation is delegated to the engine.
//!
//! ## Subcommands
//!
//! - `threshold` — backward scan for the investment threshold
//! - `decide` — per-technology decisions at one investment cost
//! - `sweep` — threshold along one parameter axis
//! - `presets` — list the built-in scenarios
//!
//! Handlers take parsed arguments and return the process exit code.

pub mod decide;
pub mod presets;
pub mod report;
pub mod scenario;
pub mod sweep;
pub mod threshold;
