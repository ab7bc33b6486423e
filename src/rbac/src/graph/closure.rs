//! Transitive inheritance closure

use super::RoleGraph;
use crate::error::{RbacError, Result};
use std::collections::BTreeSet;
use tracing::warn;

/// All roles `internal_name` inherits from, directly or transitively
///
/// The starting role is never part of the result. A parent that has no entry
/// in the graph is reported with a warning and excluded; the traversal
/// continues with the remaining branches. Every role is expanded at most once,
/// so cycles terminate.
///
/// # Errors
///
/// Returns `Internal` when `internal_name` itself is not in the graph.
pub fn resolve_inherited(internal_name: &str, graph: &RoleGraph) -> Result<BTreeSet<String>> {
    let start = graph.get(internal_name).ok_or_else(|| {
        RbacError::internal(format!("Role '{}' not found in role graph.", internal_name))
    })?;

    let mut visited: BTreeSet<&str> = BTreeSet::new();
    visited.insert(internal_name);

    let mut inherited = BTreeSet::new();
    let mut worklist: Vec<&str> = start.parent_roles.iter().map(String::as_str).rev().collect();

    while let Some(role) = worklist.pop() {
        if !visited.insert(role) {
            continue;
        }

        match graph.get(role) {
            Some(entry) => {
                inherited.insert(role.to_string());
                worklist.extend(entry.parent_roles.iter().map(String::as_str).rev());
            }
            None => warn!(
                "Inherited role '{}' of '{}' not found in role graph, skipping",
                role, internal_name
            ),
        }
    }

    Ok(inherited)
}

impl RoleGraph {
    /// See [`resolve_inherited`]
    pub fn resolve_inherited(&self, internal_name: &str) -> Result<BTreeSet<String>> {
        resolve_inherited(internal_name, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoleGraphBuilder;
    use crate::names;
    use crate::store::InheritanceRow;
    use proptest::prelude::*;

    fn graph(rows: Vec<InheritanceRow>) -> RoleGraph {
        RoleGraphBuilder::from_rows(rows).unwrap()
    }

    fn row(child: &str, parents: &[&str]) -> InheritanceRow {
        InheritanceRow::new(child, parents)
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_diamond_inheritance() {
        let g = graph(vec![row("A", &["B", "C"]), row("B", &["D"]), row("C", &["D"]), row("D", &[])]);
        assert_eq!(resolve_inherited("A", &g).unwrap(), set(&["B", "C", "D"]));
        assert_eq!(resolve_inherited("B", &g).unwrap(), set(&["D"]));
        assert!(resolve_inherited("D", &g).unwrap().is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let g = graph(vec![row("A", &["B"]), row("B", &["C"]), row("C", &["A"])]);
        assert_eq!(resolve_inherited("A", &g).unwrap(), set(&["B", "C"]));

        let self_loop = graph(vec![row("A", &["A"])]);
        assert!(resolve_inherited("A", &self_loop).unwrap().is_empty());
    }

    #[test]
    fn test_missing_parent_is_dead_end() {
        let g = graph(vec![row("A", &["B", "ghost"]), row("B", &["also_missing"])]);
        assert_eq!(resolve_inherited("A", &g).unwrap(), set(&["B"]));
    }

    #[test]
    fn test_unknown_start_role() {
        let g = graph(vec![row("A", &[])]);
        assert!(matches!(resolve_inherited("nobody", &g), Err(RbacError::Internal(_))));
    }

    #[test]
    fn test_root_closure_uses_expanded_composite() {
        let g = graph(vec![
            row(names::READ_ONLY_ROLE, &[]),
            row(names::READ_WRITE_ROLE, &[names::READ_ONLY_ROLE]),
            row(names::CLUSTER_ADMIN_ROLE, &[]),
            row(names::ROOT_ROLE, &[names::ADMIN_ROLE_V2]),
        ]);
        assert_eq!(
            g.resolve_inherited(names::ROOT_ROLE).unwrap(),
            set(&[names::CLUSTER_ADMIN_ROLE, names::READ_ONLY_ROLE, names::READ_WRITE_ROLE])
        );
    }

    proptest! {
        #[test]
        fn prop_closure_independent_of_parent_order(
            edges in proptest::collection::vec((0u8..8, 0u8..8), 0..24),
            seed in any::<u64>(),
        ) {
            let mut parents: Vec<Vec<String>> = vec![Vec::new(); 8];
            for (child, parent) in &edges {
                let p = format!("r{}", parent);
                if !parents[*child as usize].contains(&p) {
                    parents[*child as usize].push(p);
                }
            }

            let rows = |parents: &[Vec<String>]| -> Vec<InheritanceRow> {
                parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| InheritanceRow { child_role: format!("r{}", i), parent_roles: p.clone() })
                    .collect()
            };

            let forward = RoleGraphBuilder::from_rows(rows(&parents)).unwrap();

            let mut shuffled = parents.clone();
            for (i, p) in shuffled.iter_mut().enumerate() {
                p.reverse();
                if !p.is_empty() {
                    let shift = (seed as usize).wrapping_add(i) % p.len();
                    p.rotate_left(shift);
                }
            }
            let reordered = RoleGraphBuilder::from_rows(rows(&shuffled)).unwrap();

            for i in 0..8 {
                let name = format!("r{}", i);
                let a = forward.resolve_inherited(&name).unwrap();
                let b = reordered.resolve_inherited(&name).unwrap();
                prop_assert!(!a.contains(&name));
                prop_assert_eq!(&a, &b);
                prop_assert_eq!(a, forward.resolve_inherited(&name).unwrap());
            }
        }
    }
}
