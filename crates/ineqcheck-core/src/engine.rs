//! Consistency check and reduction to inter-group relations.
//!
//! # Pipeline
//!
//! ```text
//! &[Relation]
//!        ↓  relation::build_implication_graph()
//! Graph<T>            (u → v  ⇔  u ≤ v is asserted)
//!        ↓  scc::decompose()
//! Decomposition       (component map, members, condensed DAG)
//!        ↓  find_violations()      strict relation inside one component
//!        ↓  reduce()               one strictness-tagged relation per group pair
//! Report
//! ```
//!
//! A contradiction is data, not an error: [`check`] always runs every
//! relation through both passes and reports all violations in input order.
//! Errors are reserved for structural defects such as a relation endpoint
//! that has no component id.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, instrument, trace};

use crate::error::CheckError;
use crate::graph::Graph;
use crate::relation::{Group, GroupedRelation, Operator, Relation, build_implication_graph};
use crate::scc::{Decomposition, decompose};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of one [`check`] run.
#[derive(Debug, Clone)]
pub struct Report<T, L = String> {
    /// `true` iff no strict relation joins two terms of the same group.
    pub consistent: bool,
    /// Original relations that are violated, in input order.
    pub violated: Vec<Relation<T, L>>,
    /// Equivalence classes, indexed by id.
    pub groups: Vec<Group<T>>,
    /// Reduced relations between distinct groups, in first-seen order.
    pub grouped: Vec<GroupedRelation>,
    /// Group id of every term.
    pub component_of: HashMap<T, usize>,
    /// Condensed implication DAG over group ids.
    pub condensed: Graph<usize>,
}

impl<T, L> Report<T, L> {
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.consistent
    }

    #[must_use]
    pub fn group(&self, id: usize) -> Option<&Group<T>> {
        self.groups.get(id)
    }

    /// Multi-member groups that take part in no grouped relation.
    ///
    /// These would otherwise be invisible in a listing of grouped relations,
    /// so renderers print them as bare equality chains.
    pub fn standalone_groups(&self) -> impl Iterator<Item = &Group<T>> + '_ {
        let related: HashSet<usize> = self
            .grouped
            .iter()
            .flat_map(|rel| [rel.left, rel.right])
            .collect();
        self.groups
            .iter()
            .filter(move |group| group.is_equality() && !related.contains(&group.id))
    }
}

impl<T: Eq + Hash, L> Report<T, L> {
    /// Group id of `term`.
    #[must_use]
    pub fn group_of(&self, term: &T) -> Option<usize> {
        self.component_of.get(term).copied()
    }
}

impl<T: fmt::Display, L> Report<T, L> {
    /// Render `rel` as `A < B` / `A ≤ B`, groups shown as equality chains.
    ///
    /// Returns `None` if `rel` names a group id outside this report.
    #[must_use]
    pub fn display_grouped(&self, rel: &GroupedRelation) -> Option<String> {
        let left = self.group(rel.left)?;
        let right = self.group(rel.right)?;
        Some(format!("{left} {} {right}", rel.operator()))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Check `relations` for consistency and reduce them to group relations.
///
/// Pure function of its input; every call builds fresh structures.
///
/// # Errors
///
/// Returns [`CheckError::MissingVertex`] if a relation endpoint is absent
/// from the decomposition. This indicates a defect, not bad input.
#[instrument(skip(relations), fields(relation_count = relations.len()))]
pub fn check<T, L>(relations: &[Relation<T, L>]) -> Result<Report<T, L>, CheckError>
where
    T: Eq + Hash + Clone,
    L: Clone,
{
    let graph = build_implication_graph(relations);
    let Decomposition {
        component_of,
        components,
        condensed,
    } = decompose(&graph);

    let violated = find_violations(relations, &component_of)?;
    let grouped = reduce(relations, &component_of)?;
    let groups = groups_from_components(components);

    debug!(
        groups = groups.len(),
        grouped = grouped.len(),
        violations = violated.len(),
        "consistency check complete"
    );

    Ok(Report {
        consistent: violated.is_empty(),
        violated,
        groups,
        grouped,
        component_of,
        condensed,
    })
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Collect every strict relation whose endpoints share a component.
///
/// Relations are examined in their original, uncanonicalized form and
/// returned in input order.
///
/// # Errors
///
/// Returns [`CheckError::MissingVertex`] if an endpoint is not in
/// `component_of`.
pub fn find_violations<T, L>(
    relations: &[Relation<T, L>],
    component_of: &HashMap<T, usize>,
) -> Result<Vec<Relation<T, L>>, CheckError>
where
    T: Eq + Hash + Clone,
    L: Clone,
{
    let mut violated = Vec::new();
    for (idx, relation) in relations.iter().enumerate() {
        let i = lookup(component_of, &relation.left, idx)?;
        let j = lookup(component_of, &relation.right, idx)?;
        if i == j && relation.is_strict() {
            trace!(relation = idx, component = i, "strict relation inside one group");
            violated.push(relation.clone());
        }
    }
    Ok(violated)
}

/// Map relations onto group pairs and merge duplicates.
///
/// Each relation is canonicalized and mapped to `(i, j)`. Pairs with
/// `i == j` are dropped: non-strict ones hold trivially, strict ones are
/// already reported by [`find_violations`]. A pair seen more than once is
/// strict if any occurrence was strict. Output order is the order in which
/// each pair was first seen.
///
/// # Errors
///
/// Returns [`CheckError::MissingVertex`] if an endpoint is not in
/// `component_of`.
pub fn reduce<T, L>(
    relations: &[Relation<T, L>],
    component_of: &HashMap<T, usize>,
) -> Result<Vec<GroupedRelation>, CheckError>
where
    T: Eq + Hash,
{
    let mut grouped: Vec<GroupedRelation> = Vec::new();
    let mut slot: HashMap<(usize, usize), usize> = HashMap::new();

    for (idx, relation) in relations.iter().enumerate() {
        let (lower, op, upper) = relation.canonical_parts();
        let i = lookup(component_of, lower, idx)?;
        let j = lookup(component_of, upper, idx)?;
        if i == j {
            continue;
        }
        // `=` adds edges both ways, so its endpoints always share a group.
        debug_assert_ne!(op, Operator::Equal, "equality across distinct groups");

        let strict = op.is_strict();
        match slot.entry((i, j)) {
            Entry::Occupied(pos) => grouped[*pos.get()].strict |= strict,
            Entry::Vacant(pos) => {
                pos.insert(grouped.len());
                grouped.push(GroupedRelation {
                    left: i,
                    strict,
                    right: j,
                });
            }
        }
    }

    Ok(grouped)
}

/// Number components by position.
#[must_use]
pub fn groups_from_components<T>(components: Vec<Vec<T>>) -> Vec<Group<T>> {
    components
        .into_iter()
        .enumerate()
        .map(|(id, members)| Group { id, members })
        .collect()
}

fn lookup<T: Eq + Hash>(
    component_of: &HashMap<T, usize>,
    term: &T,
    relation: usize,
) -> Result<usize, CheckError> {
    component_of
        .get(term)
        .copied()
        .ok_or(CheckError::MissingVertex { relation })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
