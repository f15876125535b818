//! Nuclide identifiers.
//!
//! Accepted spellings (element symbol case-insensitive):
//! `U-238`, `U238`, `238U`, `238-U`, and isomers `Pa-234m`, `Pa234m`,
//! `234mPa`. The canonical form is `Sym-A[m]` with a capitalised symbol.
//! Whether an identifier actually exists is the data provider's call; this
//! module only decides whether a string *looks like* a nuclide, which is how
//! radiation tokens such as `SF` are told apart from progeny.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

const MAX_SYMBOL_LEN: usize = 3;
const ISOMER_SUFFIXES: [char; 3] = ['m', 'n', 'p'];

/// A syntactically valid nuclide identifier in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NuclideId {
    symbol: String,
    mass_number: u16,
    isomer: Option<char>,
}

impl NuclideId {
    /// Parse any accepted spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use secular_core::nuclide::NuclideId;
    /// assert_eq!(NuclideId::parse("u238").unwrap().to_string(), "U-238");
    /// assert_eq!(NuclideId::parse("234mPa").unwrap().to_string(), "Pa-234m");
    /// assert!(NuclideId::parse("SF").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, DataError> {
        let invalid = || DataError::InvalidIdentifier(input.to_string());
        let s = input.trim();
        if s.is_empty() || !s.is_ascii() {
            return Err(invalid());
        }

        let (symbol, rest) = if s.starts_with(|c: char| c.is_ascii_alphabetic()) {
            // Sym-A[m] / SymA[m]
            let split = s.find(|c: char| !c.is_ascii_alphabetic()).ok_or_else(invalid)?;
            let (sym, tail) = s.split_at(split);
            (sym, tail.strip_prefix('-').unwrap_or(tail).to_string())
        } else {
            // A[m]Sym / A[m]-Sym
            let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
            let (digits, tail) = s.split_at(split);
            let tail = tail.strip_prefix('-').unwrap_or(tail);
            let (isomer, sym) = match tail.chars().next() {
                Some(c) if ISOMER_SUFFIXES.contains(&c) && tail.len() > 1 => {
                    // "234mPa": a lowercase letter followed by an uppercase one
                    // is an isomer marker; "238pu" is ambiguous and read as Pu.
                    let next = tail[1..].chars().next();
                    if next.is_some_and(|n| n.is_ascii_uppercase()) {
                        (Some(c), &tail[1..])
                    } else {
                        (None, tail)
                    }
                }
                _ => (None, tail),
            };
            let mut rest = digits.to_string();
            if let Some(c) = isomer {
                rest.push(c);
            }
            (sym, rest)
        };

        if symbol.is_empty()
            || symbol.len() > MAX_SYMBOL_LEN
            || !symbol.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);
        let mass_number: u16 = digits.parse().map_err(|_| invalid())?;
        if mass_number == 0 {
            return Err(invalid());
        }

        let isomer = match suffix {
            "" => None,
            s if s.len() == 1 => {
                let c = s.chars().next().ok_or_else(invalid)?.to_ascii_lowercase();
                if !ISOMER_SUFFIXES.contains(&c) {
                    return Err(invalid());
                }
                Some(c)
            }
            _ => return Err(invalid()),
        };

        let mut chars = symbol.chars();
        let symbol = match chars.next() {
            Some(first) => {
                let mut out = first.to_ascii_uppercase().to_string();
                out.extend(chars.map(|c| c.to_ascii_lowercase()));
                out
            }
            None => return Err(invalid()),
        };

        Ok(Self {
            symbol,
            mass_number,
            isomer,
        })
    }

    /// Whether `input` parses as a nuclide identifier.
    pub fn is_nuclide(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn mass_number(&self) -> u16 {
        self.mass_number
    }

    /// Isomer suffix (`m`, `n`, `p`) for metastable states.
    pub fn isomer(&self) -> Option<char> {
        self.isomer
    }
}

impl fmt::Display for NuclideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.symbol, self.mass_number)?;
        if let Some(c) = self.isomer {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for NuclideId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NuclideId {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NuclideId> for String {
    fn from(value: NuclideId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn canon(s: &str) -> String {
        NuclideId::parse(s).unwrap().to_string()
    }

    #[test]
    fn canonical_passes_through() {
        assert_eq!(canon("U-238"), "U-238");
        assert_eq!(canon("Pa-234m"), "Pa-234m");
    }

    #[test]
    fn spellings_resolve_to_canonical() {
        for s in ["U-238", "u-238", "U238", "u238", "238U", "238u", "238-U", " U-238 "] {
            assert_eq!(canon(s), "U-238", "{s}");
        }
    }

    #[test]
    fn two_letter_symbols() {
        assert_eq!(canon("RA226"), "Ra-226");
        assert_eq!(canon("226Ra"), "Ra-226");
        assert_eq!(canon("pb-214"), "Pb-214");
    }

    #[test]
    fn isomer_spellings() {
        assert_eq!(canon("Pa234m"), "Pa-234m");
        assert_eq!(canon("Pa-234M"), "Pa-234m");
        assert_eq!(canon("234mPa"), "Pa-234m");
        assert_eq!(NuclideId::parse("Pa-234m").unwrap().isomer(), Some('m'));
    }

    #[test]
    fn leading_mass_lowercase_symbol_is_not_isomer() {
        assert_eq!(canon("239pu"), "Pu-239");
    }

    #[test]
    fn radiation_tokens_are_not_nuclides() {
        for token in ["SF", "α", "β-", "", "  ", "IT"] {
            assert!(!NuclideId::is_nuclide(token), "{token}");
        }
    }

    #[test]
    fn malformed_rejected() {
        for s in ["Invalid-999", "U-", "U-0", "-238", "U-238x", "U-238mm", "U--238", "238"] {
            assert!(NuclideId::parse(s).is_err(), "{s}");
        }
    }

    #[test]
    fn parts_accessors() {
        let id = NuclideId::parse("Th-232").unwrap();
        assert_eq!(id.symbol(), "Th");
        assert_eq!(id.mass_number(), 232);
        assert_eq!(id.isomer(), None);
    }

    proptest! {
        #[test]
        fn canonical_form_is_fixed_point(
            sym in "[A-Z][a-z]{0,2}",
            mass in 1u16..400,
            iso in proptest::option::of(prop_oneof![Just('m'), Just('n'), Just('p')]),
        ) {
            let mut s = format!("{sym}-{mass}");
            if let Some(c) = iso {
                s.push(c);
            }
            let parsed = NuclideId::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s.clone());
            prop_assert_eq!(NuclideId::parse(&parsed.to_string()).unwrap(), parsed);
        }
    }
}
