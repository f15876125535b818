//! # secular-chain: Decay-chain traversal and secular equilibrium.
//!
//! Given a measured progeny activity, back-calculates ancestor activities
//! and masses assuming secular equilibrium:
//! - **Path enumeration**: bounded depth-first search over the decay graph,
//!   collecting every simple path from an ancestor to a target.
//! - **Branching aggregation**: per-path branching products summed into a
//!   cumulative ratio, optionally scaled by the fraction of the target's
//!   decays matching a decay-type filter.
//! - **Equilibrium calculation**: activity `A / BR`, mass via `A = λN`, and
//!   linear propagation of the measured activity uncertainty.
//!
//! All nuclear data comes through [`secular_core::traits::NuclideData`].

pub mod branching;
pub mod config;
pub mod engine;
pub mod paths;

pub use branching::BranchingAggregator;
pub use config::ChainConfig;
pub use engine::{calculate_secular_equilibrium, EquilibriumCalculator};
pub use paths::PathEnumerator;
