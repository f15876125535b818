//! CSV batch mode.
//!
//! Each input row is an independent request evaluated by its own
//! calculator. A row that cannot be evaluated becomes a single output row
//! carrying the error; the batch continues.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use secular_chain::config::ChainConfig;
use secular_chain::EquilibriumCalculator;
use secular_core::traits::NuclideData;
use secular_core::types::{AncestorReport, CalculationRequest};

use crate::report::Sci;

const REQUIRED_COLUMNS: [&str; 3] = ["measured_nuclide", "measured_activity", "parent_nuclides"];

const OUTPUT_COLUMNS: [&str; 17] = [
    "input_row",
    "measured_nuclide",
    "measured_activity",
    "parent_nuclides",
    "decay_type",
    "measured_activity_uncertainty",
    "parent",
    "activity_Bq",
    "mass_g",
    "branching_ratio",
    "halflife_yr",
    "atomic_mass",
    "activity_uncertainty_Bq",
    "mass_uncertainty_g",
    "relative_uncertainty",
    "paths_json",
    "error",
];

/// One output CSV record. Field order matches [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    pub input_row: usize,
    pub measured_nuclide: String,
    pub measured_activity: String,
    pub parent_nuclides: String,
    pub decay_type: String,
    pub measured_activity_uncertainty: String,
    pub parent: String,
    #[serde(rename = "activity_Bq")]
    pub activity_bq: String,
    pub mass_g: String,
    pub branching_ratio: String,
    pub halflife_yr: String,
    pub atomic_mass: String,
    #[serde(rename = "activity_uncertainty_Bq")]
    pub activity_uncertainty_bq: String,
    pub mass_uncertainty_g: String,
    pub relative_uncertainty: String,
    pub paths_json: String,
    pub error: String,
}

/// Options shared by every row of a batch.
pub struct BatchOptions {
    pub data: Arc<dyn NuclideData>,
    pub chain: ChainConfig,
    pub explain_paths: bool,
}

/// Split a parent list on `;` if present, else `,`, else whitespace.
/// Blank items are dropped.
pub fn parse_parent_list(raw: &str) -> Vec<String> {
    let text = raw.trim();
    let parts: Vec<&str> = if text.contains(';') {
        text.split(';').collect()
    } else if text.contains(',') {
        text.split(',').collect()
    } else {
        text.split_whitespace().collect()
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Twelve-decimal [`Sci`]; `None` as empty.
pub fn csv_float(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| Sci::new(v, 12).to_string())
}

fn parse_optional_f64(text: &str, column: &str, row: usize) -> Result<Option<f64>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .with_context(|| format!("row {row}: invalid {column} {text:?}"))
}

/// Evaluate every row of `reader`. Returns the output rows and whether any
/// row or parent failed.
///
/// Fails outright only on an unreadable CSV or missing required columns.
pub fn process<R: io::Read>(reader: R, opts: &BatchOptions) -> Result<(Vec<OutputRow>, bool)> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers().context("failed to read CSV header")?.clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required CSV columns: {}", missing.join(", "));
    }
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let cols = InputColumns {
        measured_nuclide: column("measured_nuclide"),
        measured_activity: column("measured_activity"),
        parent_nuclides: column("parent_nuclides"),
        decay_type: column("decay_type"),
        uncertainty: column("measured_activity_uncertainty"),
    };

    let mut rows = Vec::new();
    let mut had_errors = false;
    for (i, record) in csv_reader.records().enumerate() {
        let index = i + 2;
        let record = record.with_context(|| format!("failed to read CSV row {index}"))?;
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").trim().to_string();

        let base = OutputRow {
            input_row: index,
            measured_nuclide: field(cols.measured_nuclide),
            measured_activity: field(cols.measured_activity),
            parent_nuclides: field(cols.parent_nuclides),
            decay_type: field(cols.decay_type),
            measured_activity_uncertainty: field(cols.uncertainty),
            ..OutputRow::default()
        };

        match evaluate_row(&base, opts) {
            Ok((parents, reports)) => {
                debug!(row = index, parents = parents.len(), "batch row evaluated");
                for report in &reports {
                    let row = parent_row(&base, report, opts.explain_paths)?;
                    had_errors |= !row.error.is_empty();
                    rows.push(row);
                }
            }
            Err(e) => {
                warn!(row = index, error = %format!("{e:#}"), "batch row failed");
                had_errors = true;
                rows.push(OutputRow {
                    error: format!("{e:#}"),
                    ..base
                });
            }
        }
    }
    Ok((rows, had_errors))
}

struct InputColumns {
    measured_nuclide: Option<usize>,
    measured_activity: Option<usize>,
    parent_nuclides: Option<usize>,
    decay_type: Option<usize>,
    uncertainty: Option<usize>,
}

fn evaluate_row(base: &OutputRow, opts: &BatchOptions) -> Result<(Vec<String>, Vec<AncestorReport>)> {
    let row = base.input_row;
    let activity = base
        .measured_activity
        .parse::<f64>()
        .with_context(|| format!("row {row}: invalid measured_activity {:?}", base.measured_activity))?;
    let parents = parse_parent_list(&base.parent_nuclides);
    let uncertainty =
        parse_optional_f64(&base.measured_activity_uncertainty, "measured_activity_uncertainty", row)?;

    if base.measured_nuclide.is_empty() {
        bail!("row {row}: measured_nuclide is empty");
    }
    if parents.is_empty() {
        bail!("row {row}: parent_nuclides is empty");
    }

    let mut request = CalculationRequest::new(base.measured_nuclide.clone(), activity, parents.clone())
        .with_paths(opts.explain_paths);
    if !base.decay_type.is_empty() {
        request = request.with_decay_type(base.decay_type.clone());
    }
    if let Some(sigma) = uncertainty {
        request = request.with_uncertainty(sigma);
    }

    let mut calc = EquilibriumCalculator::with_config(Arc::clone(&opts.data), request, opts.chain)?;
    let reports = calc.calculate()?;
    Ok((parents, reports))
}

fn parent_row(base: &OutputRow, report: &AncestorReport, explain_paths: bool) -> Result<OutputRow> {
    let mut row = OutputRow {
        parent: report.ancestor.clone(),
        ..base.clone()
    };

    match report.outcome.result() {
        Some(r) => {
            row.activity_bq = csv_float(Some(r.activity_bq));
            row.mass_g = csv_float(Some(r.mass_g));
            row.branching_ratio = csv_float(Some(r.branching_ratio));
            row.halflife_yr = csv_float(Some(r.halflife_yr));
            row.atomic_mass = csv_float(Some(r.atomic_mass));
            if let Some(u) = r.uncertainty {
                row.activity_uncertainty_bq = csv_float(Some(u.activity_bq));
                row.mass_uncertainty_g = csv_float(Some(u.mass_g));
                row.relative_uncertainty = csv_float(u.relative);
            }
            if explain_paths {
                if let Some(paths) = &r.paths {
                    row.paths_json = serde_json::to_string(paths).context("failed to encode paths")?;
                }
            }
        }
        None => {
            row.activity_bq = csv_float(Some(0.0));
            row.mass_g = csv_float(Some(0.0));
            row.branching_ratio = csv_float(Some(0.0));
            row.halflife_yr = csv_float(Some(0.0));
            if explain_paths {
                row.paths_json = "[]".into();
            }
            if let Some(e) = report.outcome.error() {
                row.error = e.to_string();
            }
        }
    }
    Ok(row)
}

/// Write a header and `rows` to `writer`. The header is written even when
/// there are no rows.
pub fn write_rows<W: io::Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(OUTPUT_COLUMNS).context("failed to write CSV header")?;
    for row in rows {
        csv_writer.serialize(row).context("failed to write CSV row")?;
    }
    csv_writer.flush().context("failed to flush CSV output")?;
    Ok(())
}
