//! Decay-type filter: shorthand normalisation and validation.
//!
//! A filter restricts the branching ratio at the measured nuclide to the
//! decays of one particle-emission mode. Shorthand is accepted on input:
//!
//! | input (case-insensitive)        | symbol |
//! |---------------------------------|--------|
//! | `a`, `alpha`                    | `α`    |
//! | `b`, `b-`, `beta`, `beta-`      | `β-`   |
//! | `b+`, `beta+`                   | `β+`   |
//! | `e`, `ec`                       | `EC`   |
//!
//! Anything else passes through unchanged and is then checked against
//! [`VALID_DECAY_TYPES`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::VALID_DECAY_TYPES;
use crate::error::ValidationError;

/// A validated decay-type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DecayType {
    Alpha,
    BetaMinus,
    BetaPlus,
    ElectronCapture,
    SpontaneousFission,
    IsomericTransition,
    Proton,
    Neutron,
    Deuteron,
    Triton,
}

impl DecayType {
    pub const ALL: [DecayType; 10] = [
        Self::Alpha,
        Self::BetaMinus,
        Self::BetaPlus,
        Self::ElectronCapture,
        Self::SpontaneousFission,
        Self::IsomericTransition,
        Self::Proton,
        Self::Neutron,
        Self::Deuteron,
        Self::Triton,
    ];

    /// Canonical symbol as it appears in decay-mode labels.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Alpha => "α",
            Self::BetaMinus => "β-",
            Self::BetaPlus => "β+",
            Self::ElectronCapture => "EC",
            Self::SpontaneousFission => "SF",
            Self::IsomericTransition => "IT",
            Self::Proton => "p",
            Self::Neutron => "n",
            Self::Deuteron => "d",
            Self::Triton => "t",
        }
    }

    /// Whether a decay-mode label counts towards this filter.
    ///
    /// Labels may be compound (`β-n`, `β+ & EC`), so a label matches when it
    /// contains the symbol.
    pub fn matches_mode(&self, mode_label: &str) -> bool {
        mode_label.contains(self.symbol())
    }

    /// Normalise and validate an optional user token in one step.
    ///
    /// `None` means "no filter" and is always accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use secular_core::decay_type::DecayType;
    /// assert_eq!(DecayType::parse_filter(None).unwrap(), None);
    /// assert_eq!(DecayType::parse_filter(Some("Alpha")).unwrap(), Some(DecayType::Alpha));
    /// assert!(DecayType::parse_filter(Some("gamma")).is_err());
    /// ```
    pub fn parse_filter(token: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match normalize_decay_type(token) {
            None => Ok(None),
            Some(normalized) => normalized.parse().map(Some),
        }
    }
}

/// Map decay-type shorthand to its canonical symbol.
///
/// The input is trimmed. Exact symbols are returned as is; recognised
/// shorthand is mapped case-insensitively; anything else is returned trimmed
/// but otherwise unchanged so validation can name it.
pub fn normalize_decay_type(token: Option<&str>) -> Option<String> {
    let token = token?.trim();
    if VALID_DECAY_TYPES.contains(&token) {
        return Some(token.to_string());
    }

    let mapped = match token.to_lowercase().as_str() {
        "a" | "alpha" => "α",
        "b" | "b-" | "beta" | "beta-" => "β-",
        "b+" | "beta+" => "β+",
        "e" | "ec" => "EC",
        _ => token,
    };
    Some(mapped.to_string())
}

impl FromStr for DecayType {
    type Err = ValidationError;

    /// Strict parse of a canonical symbol. Use [`normalize_decay_type`] first
    /// to accept shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyDecayType);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.symbol() == s)
            .ok_or_else(|| ValidationError::InvalidDecayType(s.to_string()))
    }
}

impl TryFrom<String> for DecayType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DecayType> for String {
    fn from(value: DecayType) -> Self {
        value.symbol().to_string()
    }
}

impl fmt::Display for DecayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn none_is_no_filter() {
        assert_eq!(normalize_decay_type(None), None);
        assert_eq!(DecayType::parse_filter(None).unwrap(), None);
    }

    #[test]
    fn alpha_aliases() {
        for alias in ["a", "A", "alpha", "ALPHA", " alpha ", "α"] {
            assert_eq!(normalize_decay_type(Some(alias)).as_deref(), Some("α"), "{alias}");
        }
    }

    #[test]
    fn beta_minus_aliases() {
        for alias in ["b", "b-", "beta", "Beta-", "β-"] {
            assert_eq!(normalize_decay_type(Some(alias)).as_deref(), Some("β-"), "{alias}");
        }
    }

    #[test]
    fn beta_plus_and_ec_aliases() {
        assert_eq!(normalize_decay_type(Some("b+")).as_deref(), Some("β+"));
        assert_eq!(normalize_decay_type(Some("BETA+")).as_deref(), Some("β+"));
        assert_eq!(normalize_decay_type(Some("e")).as_deref(), Some("EC"));
        assert_eq!(normalize_decay_type(Some("ec")).as_deref(), Some("EC"));
    }

    #[test]
    fn unknown_passes_through() {
        assert_eq!(normalize_decay_type(Some(" gamma ")).as_deref(), Some("gamma"));
    }

    #[test]
    fn symbols_are_case_sensitive() {
        // "P" is not the proton symbol and has no alias.
        assert!(DecayType::parse_filter(Some("P")).is_err());
        assert_eq!(DecayType::parse_filter(Some("p")).unwrap(), Some(DecayType::Proton));
        // "sf" has no alias either.
        assert!(DecayType::parse_filter(Some("sf")).is_err());
    }

    #[test]
    fn invalid_names_offending_value() {
        let err = DecayType::parse_filter(Some("invalid")).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDecayType("invalid".into()));
        assert!(err.to_string().contains("Valid types: α, β-"));
    }

    #[test]
    fn blank_is_rejected() {
        assert_eq!(
            DecayType::parse_filter(Some("   ")).unwrap_err(),
            ValidationError::EmptyDecayType
        );
    }

    #[test]
    fn every_symbol_round_trips() {
        for (t, sym) in DecayType::ALL.iter().zip(VALID_DECAY_TYPES) {
            assert_eq!(t.symbol(), sym);
            assert_eq!(sym.parse::<DecayType>().unwrap(), *t);
        }
    }

    #[test]
    fn compound_modes_match_by_containment() {
        assert!(DecayType::BetaMinus.matches_mode("β-"));
        assert!(DecayType::BetaMinus.matches_mode("β-n"));
        assert!(DecayType::Neutron.matches_mode("β-n"));
        assert!(DecayType::ElectronCapture.matches_mode("β+ & EC"));
        assert!(!DecayType::Alpha.matches_mode("β-"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,8}") {
            let once = normalize_decay_type(Some(&s));
            let twice = normalize_decay_type(once.as_deref());
            prop_assert_eq!(once, twice);
        }
    }
}
