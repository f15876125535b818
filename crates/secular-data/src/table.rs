//! In-memory nuclide table implementing [`NuclideData`].
//!
//! Records are keyed by canonical identifier, so any spelling accepted by
//! [`NuclideId::parse`] resolves to the same entry. Progeny that parse as
//! nuclides are canonicalised at insert time; radiation tokens (`SF`) are
//! kept verbatim.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use secular_core::error::DataError;
use secular_core::nuclide::NuclideId;
use secular_core::traits::NuclideData;
use secular_core::types::DecayStep;

use crate::units::TimeUnit;

/// Physical data for one nuclide.
#[derive(Debug, Clone, PartialEq)]
pub struct NuclideRecord {
    pub id: NuclideId,
    /// Seconds; `f64::INFINITY` when stable.
    pub half_life_seconds: f64,
    /// Unified atomic mass units.
    pub atomic_mass: f64,
    pub decays: Vec<DecayStep>,
}

impl NuclideRecord {
    /// A radioactive nuclide with the given half-life in seconds.
    pub fn new(id: &str, half_life_seconds: f64, atomic_mass: f64) -> Result<Self, DataError> {
        Ok(Self {
            id: NuclideId::parse(id)?,
            half_life_seconds,
            atomic_mass,
            decays: Vec::new(),
        })
    }

    /// A stable nuclide: infinite half-life, no decays.
    pub fn stable(id: &str, atomic_mass: f64) -> Result<Self, DataError> {
        Self::new(id, f64::INFINITY, atomic_mass)
    }

    /// Append a decay-table row.
    pub fn with_decay(mut self, mode: &str, fraction: f64, progeny: &str) -> Self {
        self.decays.push(DecayStep::new(mode, fraction, progeny));
        self
    }

    fn validate(&self) -> Result<(), DataError> {
        let invalid = |reason: String| DataError::InvalidRecord {
            id: self.id.to_string(),
            reason,
        };

        if self.half_life_seconds.is_nan() || self.half_life_seconds <= 0.0 {
            return Err(invalid(format!("half-life must be positive, got {}", self.half_life_seconds)));
        }
        if !(self.atomic_mass.is_finite() && self.atomic_mass > 0.0) {
            return Err(invalid(format!("atomic mass must be positive, got {}", self.atomic_mass)));
        }
        for step in &self.decays {
            if !(0.0..=1.0).contains(&step.fraction) {
                return Err(invalid(format!(
                    "branching fraction {} for {} -> {} is outside [0, 1]",
                    step.fraction, step.mode, step.progeny
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct DatasetFile {
    nuclides: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    id: String,
    /// `null` marks a stable nuclide.
    half_life: Option<f64>,
    #[serde(default = "default_unit")]
    unit: String,
    atomic_mass: f64,
    #[serde(default)]
    decays: Vec<DecayStep>,
}

fn default_unit() -> String {
    "s".to_string()
}

impl TryFrom<RawRecord> for NuclideRecord {
    type Error = DataError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let half_life_seconds = match raw.half_life {
            Some(value) => {
                if !value.is_finite() {
                    return Err(DataError::InvalidRecord {
                        id: raw.id,
                        reason: "half-life must be finite; use null for stable".into(),
                    });
                }
                raw.unit.parse::<TimeUnit>()?.to_seconds(value)
            }
            None => f64::INFINITY,
        };
        Ok(Self {
            id: NuclideId::parse(&raw.id)?,
            half_life_seconds,
            atomic_mass: raw.atomic_mass,
            decays: raw.decays,
        })
    }
}

/// The bundled U-238, Th-232 and U-235 series plus K-40.
const NATURAL_SERIES_JSON: &str = include_str!("../data/natural_series.json");

/// Nuclide data held in memory.
#[derive(Debug, Clone, Default)]
pub struct NuclideTable {
    records: HashMap<String, NuclideRecord>,
}

impl NuclideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table built from the bundled natural decay series dataset.
    pub fn natural_series() -> Result<Self, DataError> {
        Self::from_json_str(NATURAL_SERIES_JSON)
    }

    /// Parse a dataset in the JSON file format.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let file: DatasetFile =
            serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))?;
        let mut table = Self::new();
        for raw in file.nuclides {
            table.insert(NuclideRecord::try_from(raw)?)?;
        }
        table.log_dangling_progeny();
        debug!(nuclides = table.len(), "nuclide table loaded");
        Ok(table)
    }

    /// Load a dataset file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading nuclide table");
        Self::from_json_str(&json)
    }

    /// Insert a record, canonicalising its progeny identifiers.
    ///
    /// Fails on an invalid record or a duplicate identifier.
    pub fn insert(&mut self, mut record: NuclideRecord) -> Result<(), DataError> {
        record.validate()?;
        let key = record.id.to_string();
        if self.records.contains_key(&key) {
            return Err(DataError::DuplicateNuclide(key));
        }
        for step in &mut record.decays {
            if let Ok(child) = NuclideId::parse(&step.progeny) {
                step.progeny = child.to_string();
            }
        }
        self.records.insert(key, record);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, record: NuclideRecord) -> Result<Self, DataError> {
        self.insert(record)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn get(&self, id: &str) -> Option<&NuclideRecord> {
        let key = NuclideId::parse(id).ok()?.to_string();
        self.records.get(&key)
    }

    fn record(&self, id: &str) -> Result<&NuclideRecord, DataError> {
        self.get(id)
            .ok_or_else(|| DataError::UnknownNuclide(id.to_string()))
    }

    fn log_dangling_progeny(&self) {
        for record in self.records.values() {
            for step in &record.decays {
                if NuclideId::is_nuclide(&step.progeny) && !self.records.contains_key(&step.progeny) {
                    debug!(parent = %record.id, progeny = %step.progeny, "progeny not in table; traversal stops there");
                }
            }
        }
    }
}

impl NuclideData for NuclideTable {
    fn validate(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn canonical_id(&self, id: &str) -> Option<String> {
        self.get(id).map(|r| r.id.to_string())
    }

    fn half_life_seconds(&self, id: &str) -> Result<f64, DataError> {
        Ok(self.record(id)?.half_life_seconds)
    }

    fn atomic_mass(&self, id: &str) -> Result<f64, DataError> {
        Ok(self.record(id)?.atomic_mass)
    }

    fn decay_modes(&self, id: &str) -> Result<Vec<DecayStep>, DataError> {
        Ok(self.record(id)?.decays.clone())
    }
}
