//! # secular-core
//! Foundation types, errors and provider traits for the secular equilibrium
//! calculator.

pub mod constants;
pub mod decay_type;
pub mod error;
pub mod nuclide;
pub mod traits;
pub mod types;

pub use decay_type::DecayType;
pub use nuclide::NuclideId;
pub use traits::NuclideData;
