//! Cross-crate test suite for the secular equilibrium calculator.
//!
//! Scenario tests run the full validate → enumerate → aggregate → calculate
//! pipeline against the bundled natural-series dataset. Property tests run
//! it against randomly generated decay networks.

pub mod helpers;
