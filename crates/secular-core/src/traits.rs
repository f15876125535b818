//! Trait interfaces.
//!
//! - [`NuclideData`] for physical data lookup (secular-data implements)

use std::sync::Arc;

use crate::error::DataError;
use crate::types::DecayStep;

/// Read-only nuclide data provider.
///
/// Lookups are treated as fast in-memory queries; the calculator calls them
/// freely during traversal. Implementations must be immutable so one
/// provider can back many calculators across threads.
pub trait NuclideData: Send + Sync {
    /// Whether `id` names a nuclide known to this provider.
    fn validate(&self, id: &str) -> bool;

    /// Canonical spelling of `id`, or `None` if it is not a known nuclide.
    ///
    /// Identity by default; providers that accept alternative spellings
    /// override this so that traversal compares like with like.
    fn canonical_id(&self, id: &str) -> Option<String> {
        self.validate(id).then(|| id.to_string())
    }

    /// Half-life in seconds; `f64::INFINITY` for a stable nuclide.
    fn half_life_seconds(&self, id: &str) -> Result<f64, DataError>;

    /// Atomic mass in unified atomic mass units.
    fn atomic_mass(&self, id: &str) -> Result<f64, DataError>;

    /// Decay-mode table in provider order. Empty for a stable nuclide.
    fn decay_modes(&self, id: &str) -> Result<Vec<DecayStep>, DataError>;

    /// Whether the nuclide is stable.
    ///
    /// Default implementation: infinite half-life.
    fn is_stable(&self, id: &str) -> Result<bool, DataError> {
        Ok(self.half_life_seconds(id)?.is_infinite())
    }
}

impl<T: NuclideData + ?Sized> NuclideData for Arc<T> {
    fn validate(&self, id: &str) -> bool {
        (**self).validate(id)
    }

    fn canonical_id(&self, id: &str) -> Option<String> {
        (**self).canonical_id(id)
    }

    fn half_life_seconds(&self, id: &str) -> Result<f64, DataError> {
        (**self).half_life_seconds(id)
    }

    fn atomic_mass(&self, id: &str) -> Result<f64, DataError> {
        (**self).atomic_mass(id)
    }

    fn decay_modes(&self, id: &str) -> Result<Vec<DecayStep>, DataError> {
        (**self).decay_modes(id)
    }
}
