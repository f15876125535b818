//! Traversal and aggregation limits.
//!
//! [`ChainConfig`] carries the depth bound and the negligible-branching
//! threshold. Defaults match [`MAX_DEPTH`] and [`MIN_BRANCHING_RATIO`].

use secular_core::constants::{MAX_DEPTH, MIN_BRANCHING_RATIO};

/// Limits applied by the path enumerator and branching aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    /// Decay steps followed from an ancestor before a branch is abandoned.
    pub max_depth: usize,
    /// Totals below this are reported as "not in chain".
    pub min_branching_ratio: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            min_branching_ratio: MIN_BRANCHING_RATIO,
        }
    }
}

impl ChainConfig {
    /// Default limits with a custom depth bound.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth() {
        assert_eq!(ChainConfig::default().max_depth, 30);
    }

    #[test]
    fn default_threshold() {
        assert_eq!(ChainConfig::default().min_branching_ratio, 1e-15);
    }

    #[test]
    fn custom_depth_keeps_threshold() {
        let cfg = ChainConfig::with_max_depth(5);
        assert_eq!(cfg.max_depth, 5);
        assert_eq!(cfg.min_branching_ratio, MIN_BRANCHING_RATIO);
    }

    #[test]
    fn config_is_copy_and_debug() {
        let cfg = ChainConfig::default();
        let cfg2 = cfg;
        assert_eq!(cfg, cfg2);
        assert!(format!("{cfg2:?}").contains("ChainConfig"));
    }
}
