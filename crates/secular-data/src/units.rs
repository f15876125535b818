//! Half-life time units used in dataset files.

use std::str::FromStr;

use secular_core::constants::SECONDS_PER_YEAR;
use secular_core::error::DataError;

/// Time unit of a half-life value in a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    /// Julian year, 365.25 days.
    Years,
}

impl TimeUnit {
    /// Number of seconds in one unit.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Microseconds => 1e-6,
            Self::Milliseconds => 1e-3,
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
            Self::Years => SECONDS_PER_YEAR,
        }
    }

    pub fn to_seconds(&self, value: f64) -> f64 {
        value * self.seconds()
    }
}

impl FromStr for TimeUnit {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "us" | "μs" | "µs" => Ok(Self::Microseconds),
            "ms" => Ok(Self::Milliseconds),
            "s" => Ok(Self::Seconds),
            "m" | "min" => Ok(Self::Minutes),
            "h" => Ok(Self::Hours),
            "d" => Ok(Self::Days),
            "y" | "yr" => Ok(Self::Years),
            other => Err(DataError::UnknownUnit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!("s".parse::<TimeUnit>().unwrap(), TimeUnit::Seconds);
        assert_eq!("μs".parse::<TimeUnit>().unwrap(), TimeUnit::Microseconds);
        assert_eq!("us".parse::<TimeUnit>().unwrap(), TimeUnit::Microseconds);
        assert_eq!("min".parse::<TimeUnit>().unwrap(), TimeUnit::Minutes);
        assert_eq!(" y ".parse::<TimeUnit>().unwrap(), TimeUnit::Years);
    }

    #[test]
    fn unknown_unit() {
        assert_eq!(
            "fortnight".parse::<TimeUnit>().unwrap_err(),
            DataError::UnknownUnit("fortnight".into())
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(TimeUnit::Days.to_seconds(2.0), 172_800.0);
        assert_eq!(TimeUnit::Years.to_seconds(1.0), SECONDS_PER_YEAR);
        assert_eq!(TimeUnit::Minutes.to_seconds(30.0), 1_800.0);
    }
}
