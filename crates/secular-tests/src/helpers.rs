//! Shared test helpers for scenario and property tests.

use std::sync::Arc;

use secular_core::traits::NuclideData;
use secular_core::types::{AncestorReport, AncestorResult};
use secular_data::{NuclideRecord, NuclideTable};

/// The bundled natural-series dataset behind a shared provider handle.
pub fn natural() -> Arc<dyn NuclideData> {
    Arc::new(NuclideTable::natural_series().unwrap())
}

/// Identifier of node `i` in a synthetic network.
pub fn node(i: usize) -> String {
    format!("Xx-{}", i + 1)
}

/// Build a network of `n` radioactive nodes from `(from, to, weight, alpha)`
/// edges. Self-loops are dropped; out-of-range indices panic.
///
/// Each node's weights are divided by its out-degree so its fractions sum
/// to at most 1. Every node gets a one-second half-life and a mass of
/// `i + 1` u, so any node can serve as the measured nuclide.
pub fn synthetic_network(n: usize, edges: &[(usize, usize, f64, bool)]) -> NuclideTable {
    let edges: Vec<_> = edges.iter().filter(|e| e.0 != e.1).collect();
    let mut out_degree = vec![0usize; n];
    for e in &edges {
        out_degree[e.0] += 1;
    }

    let mut records: Vec<NuclideRecord> = (0..n)
        .map(|i| NuclideRecord::new(&node(i), 1.0, (i + 1) as f64).unwrap())
        .collect();
    for &&(from, to, weight, alpha) in &edges {
        let mode = if alpha { "α" } else { "β-" };
        let fraction = weight / out_degree[from] as f64;
        let record = records[from].clone().with_decay(mode, fraction, &node(to));
        records[from] = record;
    }
    records
        .into_iter()
        .try_fold(NuclideTable::new(), NuclideTable::with)
        .unwrap()
}

/// The successful result for `ancestor`, panicking on a failure outcome.
pub fn success<'a>(reports: &'a [AncestorReport], ancestor: &str) -> &'a AncestorResult {
    let report = reports
        .iter()
        .find(|r| r.ancestor == ancestor)
        .unwrap_or_else(|| panic!("no report for {ancestor}"));
    match report.outcome.result() {
        Some(result) => result,
        None => panic!("{ancestor} failed: {:?}", report.outcome.error()),
    }
}

/// `|a - b| <= tol * max(|a|, |b|)`.
pub fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs())
}
