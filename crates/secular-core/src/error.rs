//! Error types for the secular equilibrium calculator.
use thiserror::Error;

use crate::constants::VALID_DECAY_TYPES;

fn valid_decay_types() -> String {
    VALID_DECAY_TYPES.join(", ")
}

/// Request rejected before any computation is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid measured nuclide name: {0}")] InvalidMeasuredNuclide(String),
    #[error("invalid ancestor nuclide name: {0}")] InvalidAncestorNuclide(String),
    #[error("invalid decay type: {0}. Valid types: {types}", types = valid_decay_types())] InvalidDecayType(String),
    #[error("invalid decay type: must be a non-empty string")] EmptyDecayType,
    #[error("measured activity uncertainty must be >= 0, got {0}")] NegativeUncertainty(f64),
}

/// The measured nuclide cannot be reached from an ancestor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("{progeny} is not in {ancestor}'s decay chain")] NotInChain { ancestor: String, progeny: String },
    #[error("{progeny} is not in {ancestor}'s decay chain (branching ratio {ratio:e} is negligible)")] NegligibleBranching { ancestor: String, progeny: String, ratio: f64 },
}

/// Secular equilibrium is undefined for the requested nuclide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquilibriumError {
    #[error("{0} is a stable nuclide and cannot establish secular equilibrium")] StableNuclide(String),
}

/// Nuclide data provider failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("unknown nuclide: {0}")] UnknownNuclide(String),
    #[error("invalid nuclide identifier: {0}")] InvalidIdentifier(String),
    #[error("duplicate nuclide: {0}")] DuplicateNuclide(String),
    #[error("invalid record for {id}: {reason}")] InvalidRecord { id: String, reason: String },
    #[error("unknown time unit: {0}")] UnknownUnit(String),
    #[error("parse: {0}")] Parse(String),
    #[error("I/O: {0}")] Io(String),
}

/// Failure scoped to a single ancestor. Recorded in the ancestor's outcome
/// while the remaining ancestors are still evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AncestorError {
    #[error(transparent)] Chain(#[from] ChainError),
    #[error(transparent)] Equilibrium(#[from] EquilibriumError),
    #[error(transparent)] Data(#[from] DataError),
}

#[derive(Error, Debug)]
pub enum SecularError {
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Chain(#[from] ChainError),
    #[error(transparent)] Equilibrium(#[from] EquilibriumError),
    #[error(transparent)] Data(#[from] DataError),
}
