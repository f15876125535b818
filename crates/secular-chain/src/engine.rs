//! Equilibrium calculator: measured progeny activity to ancestor activity
//! and mass.
//!
//! Under secular equilibrium every member of a chain decays at the rate it
//! is produced, so an ancestor's activity is the measured activity divided
//! by the cumulative branching ratio. Mass follows from `A = λN`:
//! `m = A · M / (N_A · λ)`. Uncertainties propagate linearly since the
//! branching ratio is treated as exact.

use std::sync::Arc;

use secular_core::constants::{decay_constant, AVOGADRO, SECONDS_PER_YEAR};
use secular_core::decay_type::DecayType;
use secular_core::error::{AncestorError, EquilibriumError, SecularError, ValidationError};
use secular_core::traits::NuclideData;
use secular_core::types::{
    AncestorOutcome, AncestorReport, AncestorResult, CalculationRequest, Uncertainty,
};
use tracing::{debug, warn};

use crate::branching::BranchingAggregator;
use crate::config::ChainConfig;

/// A validated request bound to a data provider.
///
/// Construction performs all validation; [`calculate`](Self::calculate) can
/// then only fail on a stable measured nuclide. Each instance owns its
/// branching caches: use one instance per calculation rather than sharing
/// one across threads.
pub struct EquilibriumCalculator {
    measured_nuclide: String,
    measured_as_given: String,
    measured_activity: f64,
    /// (as requested, canonical)
    ancestors: Vec<(String, String)>,
    decay_type: Option<DecayType>,
    measured_activity_uncertainty: Option<f64>,
    include_paths: bool,
    aggregator: BranchingAggregator,
}

impl EquilibriumCalculator {
    /// Validate `request` against `data` with default limits.
    pub fn new(
        data: Arc<dyn NuclideData>,
        request: CalculationRequest,
    ) -> Result<Self, ValidationError> {
        Self::with_config(data, request, ChainConfig::default())
    }

    /// Validate `request` against `data`.
    ///
    /// Checks, in order: measured nuclide, each ancestor, decay type,
    /// uncertainty sign. The first failure aborts the request.
    pub fn with_config(
        data: Arc<dyn NuclideData>,
        request: CalculationRequest,
        config: ChainConfig,
    ) -> Result<Self, ValidationError> {
        let measured_nuclide = data
            .canonical_id(&request.measured_nuclide)
            .ok_or_else(|| ValidationError::InvalidMeasuredNuclide(request.measured_nuclide.clone()))?;

        let ancestors = request
            .ancestors
            .into_iter()
            .map(|name| match data.canonical_id(&name) {
                Some(canonical) => Ok((name, canonical)),
                None => Err(ValidationError::InvalidAncestorNuclide(name)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let decay_type = DecayType::parse_filter(request.decay_type.as_deref())?;

        if let Some(sigma) = request.measured_activity_uncertainty {
            if sigma < 0.0 {
                return Err(ValidationError::NegativeUncertainty(sigma));
            }
        }

        Ok(Self {
            measured_nuclide,
            measured_as_given: request.measured_nuclide,
            measured_activity: request.measured_activity,
            ancestors,
            decay_type,
            measured_activity_uncertainty: request.measured_activity_uncertainty,
            include_paths: request.include_paths,
            aggregator: BranchingAggregator::new(data, config),
        })
    }

    /// Canonical identifier of the measured nuclide.
    pub fn measured_nuclide(&self) -> &str {
        &self.measured_nuclide
    }

    /// The measured nuclide as spelled in the request.
    pub fn measured_nuclide_as_given(&self) -> &str {
        &self.measured_as_given
    }

    pub fn measured_activity(&self) -> f64 {
        self.measured_activity
    }

    pub fn measured_activity_uncertainty(&self) -> Option<f64> {
        self.measured_activity_uncertainty
    }

    /// The validated decay-type filter, if any.
    pub fn decay_type(&self) -> Option<DecayType> {
        self.decay_type
    }

    pub fn include_paths(&self) -> bool {
        self.include_paths
    }

    /// Ancestors as requested, in request order.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.ancestors.iter().map(|(name, _)| name.as_str())
    }

    /// Evaluate every ancestor.
    ///
    /// Fails up front with [`EquilibriumError::StableNuclide`] when the
    /// measured nuclide is stable. Otherwise returns one report per
    /// ancestor in request order; an ancestor that cannot be evaluated gets
    /// a failure outcome and the rest proceed.
    pub fn calculate(&mut self) -> Result<Vec<AncestorReport>, SecularError> {
        let data = self.aggregator.data();
        if data.half_life_seconds(&self.measured_nuclide)?.is_infinite() {
            return Err(EquilibriumError::StableNuclide(self.measured_nuclide.clone()).into());
        }

        let mut reports = Vec::with_capacity(self.ancestors.len());
        for i in 0..self.ancestors.len() {
            let (name, canonical) = self.ancestors[i].clone();
            let outcome = match self.evaluate(&canonical) {
                Ok(result) => AncestorOutcome::Success(result),
                Err(e) => {
                    warn!(ancestor = %name, measured = %self.measured_nuclide, error = %e, "ancestor skipped");
                    AncestorOutcome::Failure {
                        error: e,
                        include_paths: self.include_paths,
                    }
                }
            };
            reports.push(AncestorReport {
                ancestor: name,
                outcome,
            });
        }
        Ok(reports)
    }

    fn evaluate(&mut self, ancestor: &str) -> Result<AncestorResult, AncestorError> {
        let info = self
            .aggregator
            .branching_info(ancestor, &self.measured_nuclide, self.decay_type)?;
        let branching_ratio = info.branching_ratio;
        let activity_bq = self.measured_activity / branching_ratio;

        let data = self.aggregator.data();
        let half_life_s = data.half_life_seconds(ancestor)?;
        let atomic_mass = data.atomic_mass(ancestor)?;

        // grams per becquerel; undefined for a stable ancestor
        let mass_coefficient = if half_life_s.is_infinite() {
            None
        } else {
            Some(atomic_mass / (AVOGADRO * decay_constant(half_life_s)))
        };
        let mass_g = mass_coefficient.map_or(f64::INFINITY, |k| activity_bq * k);

        let uncertainty = self.measured_activity_uncertainty.map(|sigma| {
            let activity_sigma = sigma / branching_ratio;
            Uncertainty {
                activity_bq: activity_sigma,
                mass_g: mass_coefficient.map_or(f64::INFINITY, |k| activity_sigma * k),
                relative: (activity_bq != 0.0).then(|| activity_sigma / activity_bq.abs()),
            }
        });

        debug!(ancestor, activity_bq, mass_g, branching_ratio, "equilibrium: ancestor evaluated");

        let (paths, total_branching_ratio) = if self.include_paths {
            (Some(info.paths), Some(branching_ratio))
        } else {
            (None, None)
        };

        Ok(AncestorResult {
            activity_bq,
            mass_g,
            branching_ratio,
            halflife_yr: half_life_s / SECONDS_PER_YEAR,
            atomic_mass,
            uncertainty,
            paths,
            total_branching_ratio,
        })
    }
}

/// Validate `request` and evaluate it once with default limits.
pub fn calculate_secular_equilibrium(
    data: Arc<dyn NuclideData>,
    request: CalculationRequest,
) -> Result<Vec<AncestorReport>, SecularError> {
    EquilibriumCalculator::new(data, request)?.calculate()
}
