//! Core data types: decay steps and paths, branching info, per-ancestor
//! outcomes and the calculation request.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::AncestorError;

/// One row of a nuclide's decay-mode table.
///
/// `progeny` is either a nuclide identifier or a non-nuclide token such as
/// `SF` for spontaneous fission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayStep {
    pub mode: String,
    pub fraction: f64,
    pub progeny: String,
}

impl DecayStep {
    pub fn new(mode: impl Into<String>, fraction: f64, progeny: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            fraction,
            progeny: progeny.into(),
        }
    }
}

/// One route from an ancestor to a target nuclide.
///
/// `decay_modes` and `step_branching_fractions` have one entry per step
/// (`nodes.len() - 1`). `chain_branching_ratio` is the product of the step
/// fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayPath {
    pub nodes: Vec<String>,
    pub decay_modes: Vec<String>,
    pub step_branching_fractions: Vec<f64>,
    pub chain_branching_ratio: f64,
}

impl DecayPath {
    /// The one-node path used when ancestor and target coincide.
    pub fn trivial(nuclide: impl Into<String>) -> Self {
        Self {
            nodes: vec![nuclide.into()],
            decay_modes: Vec::new(),
            step_branching_fractions: Vec::new(),
            chain_branching_ratio: 1.0,
        }
    }

    /// Number of decay steps.
    pub fn len(&self) -> usize {
        self.decay_modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decay_modes.is_empty()
    }

    /// Copy of this path extended by one step.
    pub fn extended(&self, mode: &str, fraction: f64, progeny: &str) -> Self {
        let mut next = self.clone();
        next.nodes.push(progeny.to_string());
        next.decay_modes.push(mode.to_string());
        next.step_branching_fractions.push(fraction);
        next.chain_branching_ratio *= fraction;
        next
    }
}

/// A path annotated with its share of the total branching ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathContribution {
    #[serde(flatten)]
    pub path: DecayPath,
    pub decay_type_fraction_at_measured: f64,
    pub path_branching_ratio: f64,
}

/// Cumulative branching from an ancestor to the measured nuclide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchingInfo {
    pub branching_ratio: f64,
    pub decay_type_fraction_at_measured: f64,
    /// Sorted by descending `path_branching_ratio`.
    pub paths: Vec<PathContribution>,
}

/// Linearly propagated 1σ uncertainties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    #[serde(rename = "activity_uncertainty_Bq")]
    pub activity_bq: f64,
    #[serde(rename = "mass_uncertainty_g")]
    pub mass_g: f64,
    /// `None` when the ancestor activity is exactly zero.
    #[serde(rename = "relative_uncertainty")]
    pub relative: Option<f64>,
}

/// Equilibrium quantities for one ancestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncestorResult {
    #[serde(rename = "activity_Bq")]
    pub activity_bq: f64,
    /// Grams; `+inf` for a stable ancestor.
    pub mass_g: f64,
    pub branching_ratio: f64,
    pub halflife_yr: f64,
    pub atomic_mass: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<Uncertainty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathContribution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_branching_ratio: Option<f64>,
}

/// Success or failure of a single ancestor. A failure never aborts the
/// remaining ancestors of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum AncestorOutcome {
    Success(AncestorResult),
    /// `include_paths` mirrors the request so the serialised record keeps
    /// the same path fields as a success.
    Failure {
        error: AncestorError,
        include_paths: bool,
    },
}

impl AncestorOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn result(&self) -> Option<&AncestorResult> {
        match self {
            Self::Success(r) => Some(r),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AncestorError> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Branching ratio, reported as zero for a failed ancestor.
    pub fn branching_ratio(&self) -> f64 {
        self.result().map_or(0.0, |r| r.branching_ratio)
    }
}

/// Serialised as the result fields on success. A failure carries zeroed
/// activity, mass, ratio and half-life plus an `error` message, and an empty
/// `paths` list with a zero `total_branching_ratio` when paths were requested.
impl Serialize for AncestorOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct FailureFields {
            #[serde(rename = "activity_Bq")]
            activity_bq: f64,
            mass_g: f64,
            branching_ratio: f64,
            halflife_yr: f64,
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            paths: Option<Vec<PathContribution>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            total_branching_ratio: Option<f64>,
        }

        match self {
            Self::Success(result) => result.serialize(serializer),
            Self::Failure {
                error,
                include_paths,
            } => FailureFields {
                activity_bq: 0.0,
                mass_g: 0.0,
                branching_ratio: 0.0,
                halflife_yr: 0.0,
                error: error.to_string(),
                paths: include_paths.then(Vec::new),
                total_branching_ratio: include_paths.then_some(0.0),
            }
            .serialize(serializer),
        }
    }
}

/// Outcome for one ancestor, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AncestorReport {
    pub ancestor: String,
    #[serde(flatten)]
    pub outcome: AncestorOutcome,
}

/// Input to one equilibrium calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub measured_nuclide: String,
    /// Bq.
    pub measured_activity: f64,
    pub ancestors: Vec<String>,
    /// Free-text decay-type token; shorthand accepted.
    #[serde(default)]
    pub decay_type: Option<String>,
    /// 1σ, Bq.
    #[serde(default)]
    pub measured_activity_uncertainty: Option<f64>,
    #[serde(default)]
    pub include_paths: bool,
}

impl CalculationRequest {
    pub fn new<I, S>(measured_nuclide: impl Into<String>, measured_activity: f64, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            measured_nuclide: measured_nuclide.into(),
            measured_activity,
            ancestors: ancestors.into_iter().map(Into::into).collect(),
            decay_type: None,
            measured_activity_uncertainty: None,
            include_paths: false,
        }
    }

    pub fn with_decay_type(mut self, decay_type: impl Into<String>) -> Self {
        self.decay_type = Some(decay_type.into());
        self
    }

    pub fn with_uncertainty(mut self, sigma: f64) -> Self {
        self.measured_activity_uncertainty = Some(sigma);
        self
    }

    pub fn with_paths(mut self, include_paths: bool) -> Self {
        self.include_paths = include_paths;
        self
    }
}
