//! Depth-bounded enumeration of decay paths.
//!
//! Every distinct route from a start nuclide to a target is produced by a
//! depth-first search over the provider's decay tables. Each recursive call
//! receives its own copy of the visited set and the path so far, so a
//! nuclide can appear in many paths but never twice in one. Radiation
//! tokens and nuclides the provider cannot resolve end a branch silently.

use std::collections::HashSet;

use secular_core::traits::NuclideData;
use secular_core::types::DecayPath;
use tracing::trace;

/// Enumerates decay paths through one data provider.
pub struct PathEnumerator<'a> {
    data: &'a dyn NuclideData,
    max_depth: usize,
}

impl<'a> PathEnumerator<'a> {
    pub fn new(data: &'a dyn NuclideData, max_depth: usize) -> Self {
        Self { data, max_depth }
    }

    /// All paths from `start` to `target`, in depth-first order.
    ///
    /// Identifiers must be canonical. `start == target` yields the single
    /// trivial path without touching the provider. An empty result means
    /// the target is not reachable within the depth bound.
    pub fn enumerate(&self, start: &str, target: &str) -> Vec<DecayPath> {
        if start == target {
            return vec![DecayPath::trivial(start)];
        }

        let mut paths = Vec::new();
        let visited = HashSet::from([start.to_string()]);
        self.search(start, target, &visited, &DecayPath::trivial(start), 0, &mut paths);
        trace!(start, target, found = paths.len(), "paths: enumeration done");
        paths
    }

    fn search(
        &self,
        current: &str,
        target: &str,
        visited: &HashSet<String>,
        path: &DecayPath,
        depth: usize,
        out: &mut Vec<DecayPath>,
    ) {
        if depth > self.max_depth {
            return;
        }

        if current == target {
            out.push(path.clone());
            return;
        }

        let steps = match self.data.decay_modes(current) {
            Ok(steps) => steps,
            Err(e) => {
                trace!(current, error = %e, "paths: branch truncated");
                return;
            }
        };

        for step in steps {
            if !self.data.validate(&step.progeny) || visited.contains(&step.progeny) {
                continue;
            }
            let mut branch_visited = visited.clone();
            branch_visited.insert(step.progeny.clone());
            let branch_path = path.extended(&step.mode, step.fraction, &step.progeny);
            self.search(&step.progeny, target, &branch_visited, &branch_path, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use secular_core::error::DataError;
    use secular_core::types::DecayStep;
    use secular_data::{NuclideRecord, NuclideTable};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Table with every listed node radioactive and the given edges.
    fn network(nodes: &[&str], edges: &[(&str, &str, f64)]) -> NuclideTable {
        let mut table = NuclideTable::new();
        for id in nodes {
            let mut record = NuclideRecord::new(id, 1.0, 1.0).unwrap();
            for (from, to, fraction) in edges {
                if from == id {
                    record = record.with_decay("α", *fraction, to);
                }
            }
            table.insert(record).unwrap();
        }
        table
    }

    /// Counts decay-table lookups.
    struct Counting<'a> {
        inner: &'a NuclideTable,
        lookups: AtomicUsize,
    }

    impl NuclideData for Counting<'_> {
        fn validate(&self, id: &str) -> bool {
            self.inner.validate(id)
        }

        fn half_life_seconds(&self, id: &str) -> Result<f64, DataError> {
            self.inner.half_life_seconds(id)
        }

        fn atomic_mass(&self, id: &str) -> Result<f64, DataError> {
            self.inner.atomic_mass(id)
        }

        fn decay_modes(&self, id: &str) -> Result<Vec<DecayStep>, DataError> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.decay_modes(id)
        }
    }

    fn enumerate(table: &NuclideTable, start: &str, target: &str) -> Vec<DecayPath> {
        PathEnumerator::new(table, 30).enumerate(start, target)
    }

    // --- basic shapes ---

    #[test]
    fn self_path_skips_traversal() {
        let table = network(&["A-1", "B-2"], &[("A-1", "B-2", 1.0)]);
        let counting = Counting {
            inner: &table,
            lookups: AtomicUsize::new(0),
        };
        let paths = PathEnumerator::new(&counting, 30).enumerate("A-1", "A-1");
        assert_eq!(paths, vec![DecayPath::trivial("A-1")]);
        assert_eq!(counting.lookups.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn linear_chain_single_path() {
        let table = network(
            &["A-1", "B-2", "C-3"],
            &[("A-1", "B-2", 0.5), ("B-2", "C-3", 0.25)],
        );
        let paths = enumerate(&table, "A-1", "C-3");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["A-1", "B-2", "C-3"]);
        assert_eq!(paths[0].step_branching_fractions, vec![0.5, 0.25]);
        assert_eq!(paths[0].chain_branching_ratio, 0.125);
    }

    #[test]
    fn diamond_yields_both_routes_in_table_order() {
        let table = network(
            &["A-1", "B-2", "C-3", "D-4"],
            &[
                ("A-1", "B-2", 0.6),
                ("A-1", "C-3", 0.4),
                ("B-2", "D-4", 1.0),
                ("C-3", "D-4", 1.0),
            ],
        );
        let paths = enumerate(&table, "A-1", "D-4");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec!["A-1", "B-2", "D-4"]);
        assert_eq!(paths[1].nodes, vec!["A-1", "C-3", "D-4"]);
        let total: f64 = paths.iter().map(|p| p.chain_branching_ratio).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn target_stops_extension() {
        // B-2 decays on to C-3, but a path ending at B-2 must not continue.
        let table = network(
            &["A-1", "B-2", "C-3"],
            &[("A-1", "B-2", 1.0), ("B-2", "C-3", 1.0)],
        );
        let paths = enumerate(&table, "A-1", "B-2");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["A-1", "B-2"]);
    }

    #[test]
    fn unreachable_is_empty() {
        let table = network(&["A-1", "B-2", "C-3"], &[("A-1", "B-2", 1.0)]);
        assert!(enumerate(&table, "A-1", "C-3").is_empty());
        assert!(enumerate(&table, "C-3", "A-1").is_empty());
    }

    // --- filtering ---

    #[test]
    fn cycles_terminate_without_repeats() {
        let table = network(
            &["X-1", "Y-2", "Z-3"],
            &[("X-1", "Y-2", 1.0), ("Y-2", "X-1", 0.5), ("Y-2", "Z-3", 0.5)],
        );
        let paths = enumerate(&table, "X-1", "Z-3");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["X-1", "Y-2", "Z-3"]);
    }

    #[test]
    fn radiation_tokens_skipped() {
        let table = NuclideTable::new()
            .with(
                NuclideRecord::new("A-1", 1.0, 1.0)
                    .unwrap()
                    .with_decay("SF", 0.5, "SF")
                    .with_decay("α", 0.5, "B-2"),
            )
            .unwrap()
            .with(NuclideRecord::stable("B-2", 1.0).unwrap())
            .unwrap();
        let paths = enumerate(&table, "A-1", "B-2");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].decay_modes, vec!["α"]);
    }

    #[test]
    fn dangling_progeny_truncates_branch_only() {
        let table = network(
            &["A-1", "B-2"],
            &[("A-1", "Q-9", 0.3), ("A-1", "B-2", 0.7)],
        );
        let paths = enumerate(&table, "A-1", "B-2");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].chain_branching_ratio, 0.7);
    }

    /// Resolves every node but fails the decay-table lookup for one.
    struct Unreadable<'a> {
        inner: &'a NuclideTable,
        broken: &'static str,
    }

    impl NuclideData for Unreadable<'_> {
        fn validate(&self, id: &str) -> bool {
            self.inner.validate(id)
        }

        fn half_life_seconds(&self, id: &str) -> Result<f64, DataError> {
            self.inner.half_life_seconds(id)
        }

        fn atomic_mass(&self, id: &str) -> Result<f64, DataError> {
            self.inner.atomic_mass(id)
        }

        fn decay_modes(&self, id: &str) -> Result<Vec<DecayStep>, DataError> {
            if id == self.broken {
                return Err(DataError::Parse(format!("corrupt decay table for {id}")));
            }
            self.inner.decay_modes(id)
        }
    }

    #[test]
    fn unreadable_decay_table_truncates_branch_only() {
        let table = network(
            &["A-1", "B-2", "C-3", "D-4"],
            &[
                ("A-1", "B-2", 0.6),
                ("A-1", "C-3", 0.4),
                ("B-2", "D-4", 1.0),
                ("C-3", "D-4", 1.0),
            ],
        );
        let data = Unreadable {
            inner: &table,
            broken: "B-2",
        };
        let paths = PathEnumerator::new(&data, 30).enumerate("A-1", "D-4");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["A-1", "C-3", "D-4"]);
    }

    #[test]
    fn unreadable_start_yields_nothing() {
        let table = network(&["A-1", "B-2"], &[("A-1", "B-2", 1.0)]);
        let data = Unreadable {
            inner: &table,
            broken: "A-1",
        };
        assert!(PathEnumerator::new(&data, 30).enumerate("A-1", "B-2").is_empty());
    }

    // --- depth bound ---

    fn linear(len: usize) -> (NuclideTable, String) {
        let ids: Vec<String> = (1..=len + 1).map(|i| format!("N-{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let edges: Vec<(&str, &str, f64)> = refs.windows(2).map(|w| (w[0], w[1], 1.0)).collect();
        (network(&refs, &edges), ids[len].clone())
    }

    #[test]
    fn path_at_depth_bound_is_found() {
        let (table, last) = linear(5);
        let paths = PathEnumerator::new(&table, 5).enumerate("N-1", &last);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 5);
    }

    #[test]
    fn path_beyond_depth_bound_is_dropped() {
        let (table, last) = linear(5);
        assert!(PathEnumerator::new(&table, 4).enumerate("N-1", &last).is_empty());
    }

    #[test]
    fn default_bound_reaches_thirty_steps() {
        let (table, last) = linear(30);
        assert_eq!(enumerate(&table, "N-1", &last).len(), 1);
        let (table, last) = linear(31);
        assert!(enumerate(&table, "N-1", &last).is_empty());
    }

    // --- bundled dataset ---

    #[test]
    fn ac227_to_ra223_has_two_paths() {
        let table = NuclideTable::natural_series().unwrap();
        let paths = enumerate(&table, "Ac-227", "Ra-223");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec!["Ac-227", "Th-227", "Ra-223"]);
        assert_eq!(paths[1].nodes, vec!["Ac-227", "Fr-223", "Ra-223"]);
    }

    #[test]
    fn u238_to_pb214_through_both_pa234_states() {
        let table = NuclideTable::natural_series().unwrap();
        let paths = enumerate(&table, "U-238", "Pb-214");
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().any(|p| p.nodes.iter().any(|n| n == "Pa-234")));
        assert!(paths.iter().all(|p| p.nodes.last().map(String::as_str) == Some("Pb-214")));
    }

    // --- proptest ---

    fn arb_network() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
        (2usize..=7).prop_flat_map(|n| {
            let edge = (1..=n, 1..=n, 0.0f64..=1.0);
            (Just(n), proptest::collection::vec(edge, 0..18))
        })
    }

    fn build(n: usize, edges: &[(usize, usize, f64)]) -> NuclideTable {
        let ids: Vec<String> = (1..=n).map(|i| format!("N-{i}")).collect();
        let named: Vec<(String, String, f64)> = edges
            .iter()
            .filter(|(a, b, _)| a != b)
            .map(|(a, b, f)| (format!("N-{a}"), format!("N-{b}"), *f))
            .collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let edge_refs: Vec<(&str, &str, f64)> =
            named.iter().map(|(a, b, f)| (a.as_str(), b.as_str(), *f)).collect();
        network(&refs, &edge_refs)
    }

    proptest! {
        #[test]
        fn chain_ratio_is_product_of_steps((n, edges) in arb_network()) {
            let table = build(n, &edges);
            let target = format!("N-{n}");
            for path in enumerate(&table, "N-1", &target) {
                let product: f64 = path.step_branching_fractions.iter().product();
                prop_assert!((path.chain_branching_ratio - product).abs() < 1e-12);
            }
        }

        #[test]
        fn paths_are_simple_and_well_formed((n, edges) in arb_network()) {
            let table = build(n, &edges);
            let target = format!("N-{n}");
            for path in enumerate(&table, "N-1", &target) {
                prop_assert_eq!(path.nodes.first().map(String::as_str), Some("N-1"));
                prop_assert_eq!(path.nodes.last(), Some(&target));
                prop_assert_eq!(path.decay_modes.len(), path.nodes.len() - 1);
                prop_assert_eq!(path.step_branching_fractions.len(), path.nodes.len() - 1);
                let unique: HashSet<&String> = path.nodes.iter().collect();
                prop_assert_eq!(unique.len(), path.nodes.len());
            }
        }
    }
}
