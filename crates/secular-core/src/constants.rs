//! Physical and algorithmic constants.

/// Avogadro constant (mol⁻¹), exact since the 2019 SI redefinition.
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Seconds in a Julian year (365.25 days).
///
/// Used both to convert data-file half-lives given in years and to report
/// ancestor half-lives back in years.
///
/// # Examples
///
/// ```
/// use secular_core::constants::SECONDS_PER_YEAR;
/// assert_eq!(SECONDS_PER_YEAR, 31_557_600.0);
/// ```
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Maximum number of decay steps followed from an ancestor before a branch
/// is abandoned.
pub const MAX_DEPTH: usize = 30;

/// Cumulative branching ratios below this value are treated as "not in chain".
pub const MIN_BRANCHING_RATIO: f64 = 1e-15;

/// Decay-type symbols accepted as a branching filter, in display order.
pub const VALID_DECAY_TYPES: [&str; 10] = ["α", "β-", "β+", "EC", "SF", "IT", "p", "n", "d", "t"];

/// Decay constant λ = ln 2 / T½ for a half-life in seconds.
///
/// Returns 0 for an infinite (stable) half-life.
///
/// # Examples
///
/// ```
/// use secular_core::constants::decay_constant;
/// let lambda = decay_constant(std::f64::consts::LN_2);
/// assert!((lambda - 1.0).abs() < 1e-15);
/// assert_eq!(decay_constant(f64::INFINITY), 0.0);
/// ```
pub fn decay_constant(half_life_seconds: f64) -> f64 {
    std::f64::consts::LN_2 / half_life_seconds
}
