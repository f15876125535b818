//! # secular-data: in-memory nuclide data provider.
//!
//! [`NuclideTable`] implements [`secular_core::NuclideData`] over records
//! loaded from JSON. A dataset covering the natural U-238, Th-232 and U-235
//! decay series plus K-40 is bundled and available via
//! [`NuclideTable::natural_series`].

pub mod table;
pub mod units;

pub use table::{NuclideRecord, NuclideTable};
pub use units::TimeUnit;
