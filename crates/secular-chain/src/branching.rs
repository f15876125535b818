//! Cumulative branching ratios with per-instance memoisation.
//!
//! For an (ancestor, progeny, decay-type) query the aggregator enumerates
//! every decay path, weights each by the progeny's own branching fraction
//! into the requested decay type, and sums the contributions. Results are
//! cached for the life of the aggregator; the cache is owned, not shared.

use std::collections::HashMap;
use std::sync::Arc;

use secular_core::decay_type::DecayType;
use secular_core::error::{AncestorError, ChainError, DataError, EquilibriumError};
use secular_core::traits::NuclideData;
use secular_core::types::{BranchingInfo, PathContribution};
use tracing::{debug, trace};

use crate::config::ChainConfig;
use crate::paths::PathEnumerator;

type BranchingKey = (String, String, Option<DecayType>);

/// Computes and caches [`BranchingInfo`] for one data provider.
///
/// Not meant to be shared between threads: create one per calculation.
pub struct BranchingAggregator {
    data: Arc<dyn NuclideData>,
    config: ChainConfig,
    branching_cache: HashMap<BranchingKey, BranchingInfo>,
    decay_fraction_cache: HashMap<(String, DecayType), f64>,
}

impl BranchingAggregator {
    pub fn new(data: Arc<dyn NuclideData>, config: ChainConfig) -> Self {
        Self {
            data,
            config,
            branching_cache: HashMap::new(),
            decay_fraction_cache: HashMap::new(),
        }
    }

    pub fn data(&self) -> &dyn NuclideData {
        self.data.as_ref()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Number of memoised (ancestor, progeny, decay-type) results.
    pub fn cache_len(&self) -> usize {
        self.branching_cache.len()
    }

    /// Cumulative branching from `ancestor` to `progeny`.
    ///
    /// Identifiers must be canonical. Fails with:
    /// - [`EquilibriumError::StableNuclide`] if `progeny` is stable;
    /// - [`ChainError::NotInChain`] if no path connects the two;
    /// - [`ChainError::NegligibleBranching`] if the total falls below
    ///   [`ChainConfig::min_branching_ratio`].
    ///
    /// When `ancestor == progeny` the decay-type fraction is 1.0 even if a
    /// filter is set.
    pub fn branching_info(
        &mut self,
        ancestor: &str,
        progeny: &str,
        decay_type: Option<DecayType>,
    ) -> Result<BranchingInfo, AncestorError> {
        let key = (ancestor.to_string(), progeny.to_string(), decay_type);
        if let Some(info) = self.branching_cache.get(&key) {
            trace!(ancestor, progeny, "branching: cache hit");
            return Ok(info.clone());
        }

        if self.data.half_life_seconds(progeny)?.is_infinite() {
            return Err(EquilibriumError::StableNuclide(progeny.to_string()).into());
        }

        let paths = PathEnumerator::new(self.data.as_ref(), self.config.max_depth)
            .enumerate(ancestor, progeny);
        if paths.is_empty() {
            return Err(ChainError::NotInChain {
                ancestor: ancestor.to_string(),
                progeny: progeny.to_string(),
            }
            .into());
        }

        let decay_type_fraction = match decay_type {
            Some(t) if ancestor != progeny => self.decay_type_fraction(progeny, t)?,
            _ => 1.0,
        };

        let mut contributions: Vec<PathContribution> = paths
            .into_iter()
            .map(|path| {
                let path_branching_ratio = path.chain_branching_ratio * decay_type_fraction;
                PathContribution {
                    path,
                    decay_type_fraction_at_measured: decay_type_fraction,
                    path_branching_ratio,
                }
            })
            .collect();
        let total = contributions
            .iter()
            .fold(0.0, |acc, c| acc + c.path_branching_ratio);

        if total < self.config.min_branching_ratio {
            return Err(ChainError::NegligibleBranching {
                ancestor: ancestor.to_string(),
                progeny: progeny.to_string(),
                ratio: total,
            }
            .into());
        }

        contributions.sort_by(|a, b| b.path_branching_ratio.total_cmp(&a.path_branching_ratio));

        debug!(
            ancestor,
            progeny,
            paths = contributions.len(),
            branching_ratio = total,
            "branching: computed"
        );

        let info = BranchingInfo {
            branching_ratio: total,
            decay_type_fraction_at_measured: decay_type_fraction,
            paths: contributions,
        };
        self.branching_cache.insert(key, info.clone());
        Ok(info)
    }

    /// Convenience wrapper returning only the total.
    pub fn branching_ratio(
        &mut self,
        ancestor: &str,
        progeny: &str,
        decay_type: Option<DecayType>,
    ) -> Result<f64, AncestorError> {
        Ok(self.branching_info(ancestor, progeny, decay_type)?.branching_ratio)
    }

    /// Sum of `nuclide`'s own branching fractions whose mode label matches
    /// `decay_type`.
    pub fn decay_type_fraction(
        &mut self,
        nuclide: &str,
        decay_type: DecayType,
    ) -> Result<f64, DataError> {
        let key = (nuclide.to_string(), decay_type);
        if let Some(&fraction) = self.decay_fraction_cache.get(&key) {
            return Ok(fraction);
        }

        let fraction = self
            .data
            .decay_modes(nuclide)?
            .iter()
            .filter(|step| decay_type.matches_mode(&step.mode))
            .fold(0.0, |acc, step| acc + step.fraction);

        self.decay_fraction_cache.insert(key, fraction);
        Ok(fraction)
    }
}
