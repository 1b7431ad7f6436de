//! Undirected particle pairs used to build constraint graphs.

use alloc::vec::Vec as AllocVec;
use hashbrown::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An undirected pair of particle indices, stored with `a <= b`.
///
/// Because the order is canonical, the derived `Hash` and `Eq` treat
/// `Edge::new(a, b)` and `Edge::new(b, a)` as the same edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    a: usize,
    b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b { Edge { a, b } } else { Edge { a: b, b: a } }
    }

    pub fn a(&self) -> usize { self.a }
    pub fn b(&self) -> usize { self.b }

    /// `true` for a self-loop, which can never carry a constraint.
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }
}

impl From<(usize, usize)> for Edge {
    fn from((a, b): (usize, usize)) -> Self {
        Edge::new(a, b)
    }
}

/// Deduplicating edge collection that keeps first-insertion order.
///
/// Iteration order is what makes constraint order, and therefore the
/// solver, deterministic; the hash set is only used for membership.
#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
    seen: HashSet<Edge>,
    order: AllocVec<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge; returns `false` if it (or its reverse) was present.
    pub fn insert(&mut self, edge: impl Into<Edge>) -> bool {
        let edge = edge.into();
        if self.seen.insert(edge) {
            self.order.push(edge);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, edge: impl Into<Edge>) -> bool {
        self.seen.contains(&edge.into())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.order.iter().copied()
    }

    pub fn into_vec(self) -> AllocVec<Edge> {
        self.order
    }
}

impl<E: Into<Edge>> FromIterator<E> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = EdgeSet::new();
        for e in iter {
            set.insert(e);
        }
        set
    }
}
