//! Dependency resolution: turns the candidate set into a load order.
//!
//! Resolution is layered rather than a depth-first topological sort. Each
//! pass scans the remaining candidates once and takes every unit whose
//! `requires` are all satisfied by earlier passes:
//!
//! ```text
//! pass 1   units with no requirements          a, b
//! pass 2   units needing only pass-1 units     c (requires a)
//! pass 3   ...                                 d (requires c)
//! ```
//!
//! Units inside a layer keep their manifest order. When a pass takes
//! nothing while candidates remain, whatever is left depends on a unit that
//! was never selected or sits on a cycle. Resolution stops there and every
//! leftover unit is reported with the requirements it is still waiting on.

use crate::types::BuildUnit;
use std::collections::HashSet;

/// Units in load order, grouped into dependency layers.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    units: Vec<BuildUnit>,
    /// Exclusive end index of each layer in `units`.
    layer_ends: Vec<usize>,
}

impl Schedule {
    pub fn units(&self) -> &[BuildUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The schedule split into its dependency layers.
    pub fn layers(&self) -> Vec<&[BuildUnit]> {
        let mut start = 0;
        self.layer_ends
            .iter()
            .map(|&end| {
                let layer = &self.units[start..end];
                start = end;
                layer
            })
            .collect()
    }
}

/// A candidate that could not be scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    pub unit: BuildUnit,
    /// Requirements not satisfied when resolution stalled, in declared order.
    pub missing: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub schedule: Schedule,
    pub unresolved: Vec<Unresolved>,
}

/// Compute the load order of `candidates`.
pub fn resolve(candidates: Vec<BuildUnit>) -> Resolution {
    let mut remaining = candidates;
    let mut satisfied: HashSet<String> = HashSet::new();
    let mut schedule = Schedule::default();

    while !remaining.is_empty() {
        let (ready, waiting): (Vec<BuildUnit>, Vec<BuildUnit>) = remaining
            .into_iter()
            .partition(|unit| is_ready(unit, &satisfied));

        if ready.is_empty() {
            let unresolved = waiting
                .into_iter()
                .map(|unit| {
                    let missing = unit
                        .requires
                        .iter()
                        .filter(|dep| !satisfied.contains(*dep))
                        .cloned()
                        .collect();
                    Unresolved { unit, missing }
                })
                .collect();
            return Resolution {
                schedule,
                unresolved,
            };
        }

        satisfied.extend(ready.iter().map(|unit| unit.id().to_string()));
        schedule.units.extend(ready);
        schedule.layer_ends.push(schedule.units.len());
        remaining = waiting;
    }

    Resolution {
        schedule,
        unresolved: Vec::new(),
    }
}

fn is_ready(unit: &BuildUnit, satisfied: &HashSet<String>) -> bool {
    // First pass: nothing is loaded yet, so only dependency-free units qualify.
    if satisfied.is_empty() {
        return unit.requires.is_empty();
    }
    unit.requires.iter().all(|dep| satisfied.contains(dep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ids, unit, unit_requiring};

    fn position(schedule: &Schedule, id: &str) -> usize {
        schedule
            .units()
            .iter()
            .position(|u| u.id().as_str() == id)
            .unwrap_or_else(|| panic!("{id} not scheduled: {:?}", ids(schedule.units())))
    }

    #[test]
    fn empty_input_is_empty_schedule() {
        let res = resolve(Vec::new());
        assert!(res.schedule.is_empty());
        assert!(res.unresolved.is_empty());
        assert!(res.schedule.layers().is_empty());
    }

    #[test]
    fn independent_units_keep_manifest_order() {
        let res = resolve(vec![unit("s", "b"), unit("s", "a"), unit("s", "c")]);
        assert_eq!(ids(res.schedule.units()), vec!["s/b", "s/a", "s/c"]);
        assert_eq!(res.schedule.layers().len(), 1);
    }

    #[test]
    fn dependent_unit_lands_in_later_layer() {
        let res = resolve(vec![
            unit_requiring("s", "c", &["s/a"]),
            unit("s", "a"),
            unit("s", "b"),
        ]);
        let layers = res.schedule.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(ids(layers[0]), vec!["s/a", "s/b"]);
        assert_eq!(ids(layers[1]), vec!["s/c"]);
    }

    #[test]
    fn every_requirement_precedes_its_dependent() {
        let res = resolve(vec![
            unit_requiring("s", "e", &["s/d", "s/a"]),
            unit_requiring("s", "d", &["s/c"]),
            unit_requiring("s", "c", &["s/a", "s/b"]),
            unit("s", "b"),
            unit("s", "a"),
        ]);
        assert!(res.unresolved.is_empty());
        for (i, u) in res.schedule.units().iter().enumerate() {
            for dep in &u.requires {
                assert!(position(&res.schedule, dep) < i, "{dep} must precede {}", u.id());
            }
        }
        assert_eq!(res.schedule.layers().len(), 4);
    }

    #[test]
    fn chain_to_absent_unit_reports_whole_chain() {
        let res = resolve(vec![
            unit_requiring("s", "a", &["s/b"]),
            unit_requiring("s", "b", &["s/c"]),
        ]);
        assert!(res.schedule.is_empty());
        let reported: Vec<(String, Vec<String>)> = res
            .unresolved
            .iter()
            .map(|u| (u.unit.id().to_string(), u.missing.clone()))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("s/a".to_string(), vec!["s/b".to_string()]),
                ("s/b".to_string(), vec!["s/c".to_string()]),
            ]
        );
    }

    #[test]
    fn cycle_is_reported_and_rest_still_scheduled() {
        let res = resolve(vec![
            unit("s", "base"),
            unit_requiring("s", "x", &["s/y", "s/base"]),
            unit_requiring("s", "y", &["s/x"]),
            unit_requiring("s", "ok", &["s/base"]),
        ]);
        assert_eq!(ids(res.schedule.units()), vec!["s/base", "s/ok"]);
        let stuck: Vec<String> = res.unresolved.iter().map(|u| u.unit.id().to_string()).collect();
        assert_eq!(stuck, vec!["s/x", "s/y"]);
        // Satisfied requirements are not listed as missing.
        assert_eq!(res.unresolved[0].missing, vec!["s/y"]);
    }

    #[test]
    fn self_requirement_never_resolves() {
        let res = resolve(vec![unit("s", "a"), unit_requiring("s", "b", &["s/b"])]);
        assert_eq!(ids(res.schedule.units()), vec!["s/a"]);
        assert_eq!(res.unresolved[0].missing, vec!["s/b"]);
    }

    #[test]
    fn only_dependent_units_stall_on_first_pass() {
        // Nothing is dependency-free, so the very first pass stalls.
        let res = resolve(vec![
            unit_requiring("s", "a", &["s/b"]),
            unit_requiring("s", "b", &["s/a"]),
        ]);
        assert!(res.schedule.is_empty());
        assert_eq!(res.unresolved.len(), 2);
    }

    #[test]
    fn dependency_free_unit_behaves_the_same_in_later_passes() {
        // `late` has no requirements but is declared after a dependent unit;
        // it must still land in the first layer, and a dependency-free unit
        // evaluated against a non-empty satisfied set is always ready.
        let res = resolve(vec![
            unit_requiring("s", "dep", &["s/root"]),
            unit("s", "root"),
            unit("s", "late"),
        ]);
        let layers = res.schedule.layers();
        assert_eq!(ids(layers[0]), vec!["s/root", "s/late"]);
        assert_eq!(ids(layers[1]), vec!["s/dep"]);

        let satisfied: HashSet<String> = ["s/root".to_string()].into_iter().collect();
        assert!(is_ready(&unit("s", "free"), &satisfied));
        assert!(is_ready(&unit("s", "free"), &HashSet::new()));
    }
}
