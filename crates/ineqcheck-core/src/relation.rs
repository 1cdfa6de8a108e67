//! Relation records, canonical form, and the implication graph.
//!
//! A [`Relation`] is one binary comparison `left op right` between two
//! opaque terms. The implication graph built from a relation sequence has an
//! edge `u → v` for every implied `u ≤ v`:
//!
//! | operator | edges           |
//! |----------|-----------------|
//! | `<`, `≤` | `left → right`  |
//! | `>`, `≥` | `right → left`  |
//! | `=`      | both directions |
//!
//! Strict operators contribute a single forward edge. Two terms only land in
//! the same strongly connected component when non-strict edges close a cycle
//! between them; a strict relation between such terms is a contradiction.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::error::CheckError;
use crate::graph::Graph;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// One of the five relation symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<`
    Less,
    /// `≤`
    LessEq,
    /// `=`
    Equal,
    /// `≥`
    GreaterEq,
    /// `>`
    Greater,
}

impl Operator {
    pub const ALL: [Self; 5] = [
        Self::Less,
        Self::LessEq,
        Self::Equal,
        Self::GreaterEq,
        Self::Greater,
    ];

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessEq => "≤",
            Self::Equal => "=",
            Self::GreaterEq => "≥",
            Self::Greater => ">",
        }
    }

    /// ASCII spelling accepted by the parser as an alias.
    #[must_use]
    pub const fn ascii_symbol(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Equal => "==",
            Self::GreaterEq => ">=",
            Self::Greater => ">",
        }
    }

    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Less | Self::Greater)
    }

    /// `true` for `<`, `≤` and `=`.
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        matches!(self, Self::Less | Self::LessEq | Self::Equal)
    }

    /// The operator obtained by swapping operands (`<` ↔ `>`, `≤` ↔ `≥`).
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::LessEq => Self::GreaterEq,
            Self::Equal => Self::Equal,
            Self::GreaterEq => Self::LessEq,
            Self::Greater => Self::Less,
        }
    }

    /// Implies `left ≤ right`.
    const fn implies_forward(self) -> bool {
        self.is_canonical()
    }

    /// Implies `right ≤ left`.
    const fn implies_backward(self) -> bool {
        matches!(self, Self::GreaterEq | Self::Greater | Self::Equal)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CheckError;

    /// Accepts `<`, `≤`, `=`, `≥`, `>` and the aliases `<=`, `==`, `>=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Less),
            "≤" | "<=" => Ok(Self::LessEq),
            "=" | "==" => Ok(Self::Equal),
            "≥" | ">=" => Ok(Self::GreaterEq),
            ">" => Ok(Self::Greater),
            other => Err(CheckError::InvalidOperator(other.to_string())),
        }
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// A single comparison `left op right`, optionally labelled.
///
/// The label is carried through for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation<T, L = String> {
    pub left: T,
    pub op: Operator,
    pub right: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<L>,
}

impl<T, L> Relation<T, L> {
    #[must_use]
    pub const fn new(left: T, op: Operator, right: T) -> Self {
        Self {
            left,
            op,
            right,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: L) -> Self {
        self.label = Some(label);
        self
    }

    /// Rewrite `>`/`≥` as `<`/`≤` by swapping operands. Idempotent.
    #[must_use]
    pub fn canonicalize(self) -> Self {
        if self.op.is_canonical() {
            return self;
        }
        Self {
            left: self.right,
            op: self.op.flipped(),
            right: self.left,
            label: self.label,
        }
    }

    /// Borrowed canonical view: `(lower, op, upper)` with `op` in `<`, `≤`, `=`.
    #[must_use]
    pub const fn canonical_parts(&self) -> (&T, Operator, &T) {
        if self.op.is_canonical() {
            (&self.left, self.op, &self.right)
        } else {
            (&self.right, self.op.flipped(), &self.left)
        }
    }

    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        self.op.is_canonical()
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.op.is_strict()
    }
}

impl<T: fmt::Display, L: fmt::Display> fmt::Display for Relation<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Terms proven equal: one strongly connected component of the implication
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<T> {
    pub id: usize,
    pub members: Vec<T>,
}

impl<T> Group<T> {
    /// Return `true` if the group holds more than one term.
    #[must_use]
    pub fn is_equality(&self) -> bool {
        self.members.len() > 1
    }
}

impl<T: fmt::Display> fmt::Display for Group<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(" = ")?;
            }
            write!(f, "{member}")?;
        }
        Ok(())
    }
}

/// Reduced relation between two distinct groups, by group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupedRelation {
    pub left: usize,
    pub strict: bool,
    pub right: usize,
}

impl GroupedRelation {
    /// `<` when strict, `≤` otherwise.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        if self.strict {
            Operator::Less
        } else {
            Operator::LessEq
        }
    }
}

// ---------------------------------------------------------------------------
// Implication graph
// ---------------------------------------------------------------------------

/// Build the `≤`-implication graph for `relations`.
///
/// Both endpoints of each relation are interned (left first) before its
/// edges are added, so vertex order is the order terms first appear in the
/// input regardless of operator direction.
#[must_use]
#[instrument(skip(relations), fields(relation_count = relations.len()))]
pub fn build_implication_graph<T, L>(relations: &[Relation<T, L>]) -> Graph<T>
where
    T: Eq + Hash + Clone,
{
    let mut graph = Graph::new();
    for relation in relations {
        let l = graph.add_vertex(relation.left.clone());
        let r = graph.add_vertex(relation.right.clone());
        if relation.op.implies_forward() {
            graph.link(l, r);
        }
        if relation.op.implies_backward() {
            graph.link(r, l);
        }
    }
    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "implication graph built"
    );
    graph
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(left: &'static str, op: Operator, right: &'static str) -> Relation<&'static str> {
        Relation::new(left, op, right)
    }

    fn edges(g: &Graph<&'static str>) -> Vec<(&'static str, &'static str)> {
        g.edges().map(|(u, v)| (*u, *v)).collect()
    }

    #[test]
    fn canonicalize_flips_greater_operators() {
        let r = rel("x", Operator::Greater, "y").canonicalize();
        assert_eq!(r, rel("y", Operator::Less, "x"));

        let r = rel("x", Operator::GreaterEq, "y").canonicalize();
        assert_eq!(r, rel("y", Operator::LessEq, "x"));
    }

    #[test]
    fn canonicalize_leaves_canonical_relations_alone() {
        for op in [Operator::Less, Operator::LessEq, Operator::Equal] {
            let r = rel("a", op, "b");
            assert_eq!(r.clone().canonicalize(), r);
        }
    }

    #[test]
    fn canonicalize_is_idempotent_and_keeps_label() {
        for op in Operator::ALL {
            let r = rel("a", op, "b").with_label("L1".to_string());
            let once = r.clone().canonicalize();
            let twice = once.clone().canonicalize();
            assert_eq!(once, twice);
            assert!(once.is_canonical());
            assert_eq!(once.label.as_deref(), Some("L1"));
        }
    }

    #[test]
    fn canonical_parts_matches_canonicalize() {
        for op in Operator::ALL {
            let r = rel("a", op, "b");
            let (l, o, rr) = r.canonical_parts();
            let c = r.clone().canonicalize();
            assert_eq!((*l, o, *rr), (c.left, c.op, c.right));
        }
    }

    #[test]
    fn operator_parses_unicode_and_ascii() {
        assert_eq!("≤".parse::<Operator>(), Ok(Operator::LessEq));
        assert_eq!("<=".parse::<Operator>(), Ok(Operator::LessEq));
        assert_eq!(">=".parse::<Operator>(), Ok(Operator::GreaterEq));
        assert_eq!("==".parse::<Operator>(), Ok(Operator::Equal));
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
            assert_eq!(op.ascii_symbol().parse::<Operator>(), Ok(op));
        }
    }

    #[test]
    fn operator_rejects_unknown_token() {
        let err = "≠".parse::<Operator>().expect_err("not an operator");
        assert_eq!(err, CheckError::InvalidOperator("≠".to_string()));
    }

    #[test]
    fn flipped_is_an_involution() {
        for op in Operator::ALL {
            assert_eq!(op.flipped().flipped(), op);
            assert_eq!(op.flipped().is_strict(), op.is_strict());
        }
    }

    #[test]
    fn relation_display_includes_label() {
        let r = rel("x", Operator::LessEq, "y");
        assert_eq!(r.to_string(), "x ≤ y");
        let r = r.with_label("bound".to_string());
        assert_eq!(r.to_string(), "bound: x ≤ y");
    }

    #[test]
    fn group_display_joins_members_with_equals() {
        let g = Group {
            id: 0,
            members: vec!["x", "y", "z"],
        };
        assert_eq!(g.to_string(), "x = y = z");
        assert!(g.is_equality());

        let single = Group {
            id: 1,
            members: vec!["a"],
        };
        assert_eq!(single.to_string(), "a");
        assert!(!single.is_equality());
    }

    #[test]
    fn implication_graph_edges_per_operator() {
        let g = build_implication_graph(&[
            rel("a", Operator::Less, "b"),
            rel("c", Operator::Greater, "d"),
            rel("e", Operator::Equal, "f"),
        ]);
        assert_eq!(g.vertices(), &["a", "b", "c", "d", "e", "f"]);
        assert_eq!(edges(&g), vec![("a", "b"), ("d", "c"), ("e", "f"), ("f", "e")]);
    }

    #[test]
    fn strict_relation_never_adds_reverse_edge() {
        let g = build_implication_graph(&[rel("a", Operator::Less, "b")]);
        assert_eq!(g.successors(&"b").count(), 0);
        let g = build_implication_graph(&[rel("a", Operator::Greater, "b")]);
        assert_eq!(g.successors(&"a").count(), 0);
        assert_eq!(edges(&g), vec![("b", "a")]);
    }

    #[test]
    fn greater_relation_keeps_left_first_vertex_order() {
        let g = build_implication_graph(&[rel("x", Operator::GreaterEq, "y")]);
        assert_eq!(g.vertices(), &["x", "y"]);
        assert_eq!(edges(&g), vec![("y", "x")]);
    }

    #[test]
    fn grouped_relation_operator() {
        let strict = GroupedRelation {
            left: 0,
            strict: true,
            right: 1,
        };
        assert_eq!(strict.operator(), Operator::Less);
        let weak = GroupedRelation {
            strict: false,
            ..strict
        };
        assert_eq!(weak.operator(), Operator::LessEq);
    }
}
