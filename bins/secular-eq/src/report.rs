//! Plain-text renderings of calculation results.
//!
//! Three shapes: the full human-readable report, the space-separated quiet
//! line, and the mass-only line. Numbers use a signed exponent of at least
//! two digits (`1.0000e+02`).

use std::fmt;

use secular_chain::EquilibriumCalculator;
use secular_core::types::{AncestorReport, AncestorResult, PathContribution};

const RULE_WIDTH: usize = 80;

/// Scientific notation with a fixed number of mantissa decimals.
///
/// Infinities print as `inf`/`-inf` and NaN as `nan`.
#[derive(Debug, Clone, Copy)]
pub struct Sci {
    pub value: f64,
    pub decimals: usize,
}

impl Sci {
    pub fn new(value: f64, decimals: usize) -> Self {
        Self { value, decimals }
    }
}

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_nan() {
            return f.write_str("nan");
        }
        if self.value.is_infinite() {
            return f.write_str(if self.value > 0.0 { "inf" } else { "-inf" });
        }
        let raw = format!("{:.*e}", self.decimals, self.value);
        match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                write!(f, "{mantissa}e{sign}{digits:0>2}")
            }
            None => f.write_str(&raw),
        }
    }
}

/// Four-decimal [`Sci`] rendered to a string.
pub fn sci(value: f64) -> String {
    Sci::new(value, 4).to_string()
}

/// Per ancestor: `activity mass`, plus `activity_unc mass_unc` when the
/// request carried an uncertainty. Failures print `NaN` placeholders.
pub fn quiet_line(reports: &[AncestorReport], with_uncertainty: bool) -> String {
    let parts: Vec<String> = reports
        .iter()
        .map(|report| match (report.outcome.result(), with_uncertainty) {
            (Some(r), true) => match r.uncertainty {
                Some(u) => format!(
                    "{} {} {} {}",
                    sci(r.activity_bq),
                    sci(r.mass_g),
                    sci(u.activity_bq),
                    sci(u.mass_g)
                ),
                None => format!("{} {}", sci(r.activity_bq), sci(r.mass_g)),
            },
            (Some(r), false) => format!("{} {}", sci(r.activity_bq), sci(r.mass_g)),
            (None, true) => "NaN NaN NaN NaN".into(),
            (None, false) => "NaN NaN".into(),
        })
        .collect();
    parts.join(" ")
}

/// Per ancestor mass in grams, or `NaN` on failure.
pub fn mass_only_line(reports: &[AncestorReport]) -> String {
    let parts: Vec<String> = reports
        .iter()
        .map(|report| match report.outcome.result() {
            Some(r) => sci(r.mass_g),
            None => "NaN".into(),
        })
        .collect();
    parts.join(" ")
}

/// Full report with a banner, one block per ancestor and, when paths were
/// requested, the numbered path list.
pub struct HumanReport<'a> {
    calc: &'a EquilibriumCalculator,
    reports: &'a [AncestorReport],
}

pub fn human_report<'a>(
    calc: &'a EquilibriumCalculator,
    reports: &'a [AncestorReport],
) -> HumanReport<'a> {
    HumanReport { calc, reports }
}

impl fmt::Display for HumanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calc = self.calc;
        let measured = calc.measured_nuclide_as_given();
        let heavy = "=".repeat(RULE_WIDTH);

        writeln!(f, "{heavy}")?;
        writeln!(f, "Secular Equilibrium Calculation Results")?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "\nMeasured nuclide: {measured}")?;
        writeln!(f, "Measured activity: {} Bq", Sci::new(calc.measured_activity(), 4))?;
        if let Some(sigma) = calc.measured_activity_uncertainty() {
            writeln!(f, "Measured activity uncertainty: {} Bq", Sci::new(sigma, 4))?;
        }
        writeln!(f, "\n{}", "-".repeat(RULE_WIDTH))?;

        for report in self.reports {
            let parent = &report.ancestor;
            writeln!(f, "\nParent nuclide: {parent}")?;
            match report.outcome.result() {
                Some(r) => self.write_result(f, parent, r)?,
                None => {
                    if let Some(e) = report.outcome.error() {
                        writeln!(f, "  Error: {e}")?;
                    }
                    writeln!(
                        f,
                        "  Branching ratio ({parent} -> {measured}): {:.6}",
                        report.outcome.branching_ratio()
                    )?;
                }
            }
        }

        writeln!(f, "\n{heavy}")
    }
}

impl HumanReport<'_> {
    fn write_result(&self, f: &mut fmt::Formatter<'_>, parent: &str, r: &AncestorResult) -> fmt::Result {
        let measured = self.calc.measured_nuclide_as_given();
        writeln!(f, "  Half-life: {} years", Sci::new(r.halflife_yr, 4))?;
        writeln!(f, "  Atomic mass: {:.4} u", r.atomic_mass)?;
        writeln!(f, "  Branching ratio ({parent} -> {measured}): {:.6}", r.branching_ratio)?;
        writeln!(f, "  Calculated activity: {} Bq", Sci::new(r.activity_bq, 4))?;

        if r.mass_g.is_infinite() {
            writeln!(f, "  Mass: Cannot calculate (stable nuclide)")?;
        } else {
            writeln!(f, "  Mass: {} g", Sci::new(r.mass_g, 4))?;
            if let Some((scale, unit)) = small_mass_unit(r.mass_g) {
                writeln!(f, "       {} {unit}", Sci::new(r.mass_g * scale, 4))?;
            }
        }

        if let Some(u) = r.uncertainty {
            writeln!(f, "  Activity uncertainty: {} Bq", Sci::new(u.activity_bq, 4))?;
            if u.mass_g.is_infinite() {
                writeln!(f, "  Mass uncertainty: inf")?;
            } else {
                writeln!(f, "  Mass uncertainty: {} g", Sci::new(u.mass_g, 4))?;
            }
            match u.relative {
                Some(rel) => writeln!(f, "  Relative uncertainty: {:.2}%", rel * 100.0)?,
                None => writeln!(f, "  Relative uncertainty: N/A (zero activity)")?,
            }
        }

        if self.calc.include_paths() {
            writeln!(f, "  Path contributions:")?;
            self.write_paths(f, r.paths.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }

    fn write_paths(&self, f: &mut fmt::Formatter<'_>, paths: &[PathContribution]) -> fmt::Result {
        if paths.is_empty() {
            writeln!(f, "    (none)")?;
        }
        for (idx, p) in paths.iter().enumerate() {
            let modes = if p.path.decay_modes.is_empty() {
                "(same nuclide)".to_string()
            } else {
                p.path.decay_modes.join(" | ")
            };
            writeln!(f, "    [{}] {}", idx + 1, p.path.nodes.join(" -> "))?;
            writeln!(f, "        Modes: {modes}")?;
            writeln!(
                f,
                "        Chain branching ratio: {}",
                Sci::new(p.path.chain_branching_ratio, 6)
            )?;
            if let Some(filter) = self.calc.decay_type() {
                if p.decay_type_fraction_at_measured != 1.0 {
                    writeln!(
                        f,
                        "        Measured decay-type fraction ({filter}): {}",
                        Sci::new(p.decay_type_fraction_at_measured, 6)
                    )?;
                }
            }
            writeln!(f, "        Path contribution: {}", Sci::new(p.path_branching_ratio, 6))?;
        }
        Ok(())
    }
}

/// Scale factor and unit for masses below one gram.
fn small_mass_unit(mass_g: f64) -> Option<(f64, &'static str)> {
    if mass_g < 1e-6 {
        Some((1e9, "ng"))
    } else if mass_g < 1e-3 {
        Some((1e6, "µg"))
    } else if mass_g < 1.0 {
        Some((1e3, "mg"))
    } else {
        None
    }
}
