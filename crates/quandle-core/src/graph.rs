//! # Cayley Graph
//!
//! The result of an enumeration: the vertex set and the labeled edge set.
//!
//! A completed enumeration yields one vertex per quandle element and one edge
//! `x -g-> x^g` per element and generator. The query helpers here read the
//! quandle operation back out of the graph and check its axioms.

use crate::store::EdgeStore;
use crate::{Edge, Generator, Vertex, Word};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Letters used to display generator labels.
const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Final (or partial) vertex set and edge set of an enumeration.
///
/// Uses `BTreeSet` exclusively for deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CayleyGraph {
    generator_count: u32,
    vertices: BTreeSet<Vertex>,
    edges: BTreeSet<Edge>,
}

impl CayleyGraph {
    /// Create a graph from raw parts.
    #[must_use]
    pub fn new(generator_count: u32, vertices: BTreeSet<Vertex>, edges: BTreeSet<Edge>) -> Self {
        Self {
            generator_count,
            vertices,
            edges,
        }
    }

    /// Copy the current contents of an edge store.
    #[must_use]
    pub fn from_store(generator_count: u32, store: &EdgeStore) -> Self {
        Self::new(
            generator_count,
            store.vertex_set().clone(),
            store.edge_set().clone(),
        )
    }

    #[must_use]
    pub fn generator_count(&self) -> u32 {
        self.generator_count
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices.iter().copied()
    }

    /// Edges in `(source, target, label)` order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    #[must_use]
    pub fn vertex_set(&self) -> &BTreeSet<Vertex> {
        &self.vertices
    }

    #[must_use]
    pub fn edge_set(&self) -> &BTreeSet<Edge> {
        &self.edges
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn contains_vertex(&self, v: Vertex) -> bool {
        self.vertices.contains(&v)
    }

    #[must_use]
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// `v^g`, if the edge exists.
    #[must_use]
    pub fn act(&self, v: Vertex, g: Generator) -> Option<Vertex> {
        let low = Edge::new(v, Vertex(0), Generator(0));
        let high = Edge::new(v, Vertex(u64::MAX), Generator(u32::MAX));
        self.edges
            .range(low..=high)
            .find(|e| e.label == g)
            .map(|e| e.target)
    }

    /// The `x` with `x^g = v`, if the edge exists.
    #[must_use]
    pub fn act_inverse(&self, v: Vertex, g: Generator) -> Option<Vertex> {
        self.edges
            .iter()
            .find(|e| e.target == v && e.label == g)
            .map(|e| e.source)
    }

    /// Follow a word from `v`. Returns `None` if some step has no edge.
    #[must_use]
    pub fn apply_word(&self, v: Vertex, word: &Word) -> Option<Vertex> {
        word.steps().iter().try_fold(v, |current, step| {
            if step.inverse {
                self.act_inverse(current, step.generator)
            } else {
                self.act(current, step.generator)
            }
        })
    }

    /// No two edges share `(source, label)` with different targets.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        Self::keys_unique(self.edges.iter().map(|e| ((e.source, e.label), e.target)))
    }

    /// No two edges share `(target, label)` with different sources.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        Self::keys_unique(self.edges.iter().map(|e| ((e.target, e.label), e.source)))
    }

    /// Every generator acts as a bijection on the whole vertex set: each
    /// vertex has exactly one outgoing and one incoming edge per generator.
    #[must_use]
    pub fn is_total(&self) -> bool {
        let mut outgoing: BTreeMap<(Vertex, Generator), usize> = BTreeMap::new();
        let mut incoming: BTreeMap<(Vertex, Generator), usize> = BTreeMap::new();
        for e in &self.edges {
            if !self.vertices.contains(&e.source) || !self.vertices.contains(&e.target) {
                return false;
            }
            *outgoing.entry((e.source, e.label)).or_default() += 1;
            *incoming.entry((e.target, e.label)).or_default() += 1;
        }

        self.vertices.iter().all(|&v| {
            (1..=self.generator_count).map(Generator).all(|g| {
                outgoing.get(&(v, g)) == Some(&1) && incoming.get(&(v, g)) == Some(&1)
            })
        })
    }

    /// Renumber vertices to `1..=n` in ascending order of their current ids.
    ///
    /// Ids left behind by merges are sparse; this is the numbering a
    /// renderer displays.
    #[must_use]
    pub fn relabeled(&self) -> Self {
        let mapping: BTreeMap<Vertex, Vertex> = self
            .vertices
            .iter()
            .zip(1u64..)
            .map(|(&old, new)| (old, Vertex(new)))
            .collect();
        let renumber = |v: Vertex| mapping.get(&v).copied().unwrap_or(v);

        Self {
            generator_count: self.generator_count,
            vertices: mapping.values().copied().collect(),
            edges: self
                .edges
                .iter()
                .map(|e| Edge::new(renumber(e.source), renumber(e.target), e.label))
                .collect(),
        }
    }

    /// Display name of a generator: `a`, `b`, ... then its number past `z`.
    #[must_use]
    pub fn label_letter(g: Generator) -> String {
        g.0.checked_sub(1)
            .and_then(|i| ALPHABET.get(i as usize))
            .map(|&b| char::from(b).to_string())
            .unwrap_or_else(|| g.0.to_string())
    }

    fn keys_unique<K: Ord, V: PartialEq>(pairs: impl Iterator<Item = (K, V)>) -> bool {
        let mut seen: BTreeMap<K, V> = BTreeMap::new();
        for (key, value) in pairs {
            if let Some(existing) = seen.get(&key) {
                if *existing != value {
                    return false;
                }
            } else {
                seen.insert(key, value);
            }
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(generators: u32, vertices: &[u64], edges: &[(u64, u64, u32)]) -> CayleyGraph {
        CayleyGraph::new(
            generators,
            vertices.iter().map(|&v| Vertex(v)).collect(),
            edges
                .iter()
                .map(|&(s, t, g)| Edge::new(Vertex(s), Vertex(t), Generator(g)))
                .collect(),
        )
    }

    /// The three-element quandle {a, b, b^a}: a fixes everything but swaps b
    /// and b^a; b fixes a and b^a.
    fn three_element() -> CayleyGraph {
        graph(
            2,
            &[1, 2, 8],
            &[
                (1, 1, 1),
                (1, 1, 2),
                (2, 2, 2),
                (2, 8, 1),
                (8, 2, 1),
                (8, 8, 2),
            ],
        )
    }

    #[test]
    fn act_follows_edges() {
        let g = three_element();
        assert_eq!(g.act(Vertex(2), Generator(1)), Some(Vertex(8)));
        assert_eq!(g.act_inverse(Vertex(8), Generator(1)), Some(Vertex(2)));
        assert_eq!(g.act(Vertex(3), Generator(1)), None);
    }

    #[test]
    fn apply_word_walks_both_directions() {
        let g = three_element();
        let word = Word::from_signed(&[1, 2, -1]).expect("word");
        assert_eq!(g.apply_word(Vertex(2), &word), Some(Vertex(2)));
    }

    #[test]
    fn axioms_hold_on_complete_graph() {
        let g = three_element();
        assert!(g.is_functional());
        assert!(g.is_injective());
        assert!(g.is_total());
    }

    #[test]
    fn detects_functionality_violation() {
        let g = graph(1, &[1, 2], &[(1, 1, 1), (1, 2, 1)]);
        assert!(!g.is_functional());
        assert!(g.is_injective());
        assert!(!g.is_total());
    }

    #[test]
    fn detects_injectivity_violation() {
        let g = graph(1, &[1, 2], &[(1, 1, 1), (2, 1, 1)]);
        assert!(g.is_functional());
        assert!(!g.is_injective());
    }

    #[test]
    fn partial_graph_is_not_total() {
        let g = graph(2, &[1, 2], &[(1, 1, 1), (2, 2, 2)]);
        assert!(!g.is_total());
    }

    #[test]
    fn relabel_makes_ids_consecutive() {
        let g = three_element().relabeled();
        assert_eq!(
            g.vertices().collect::<Vec<_>>(),
            vec![Vertex(1), Vertex(2), Vertex(3)]
        );
        assert!(g.contains_edge(&Edge::new(Vertex(2), Vertex(3), Generator(1))));
        assert_eq!(g.edge_count(), 6);
        assert!(g.is_total());
    }

    #[test]
    fn label_letters() {
        assert_eq!(CayleyGraph::label_letter(Generator(1)), "a");
        assert_eq!(CayleyGraph::label_letter(Generator(26)), "z");
        assert_eq!(CayleyGraph::label_letter(Generator(27)), "27");
        assert_eq!(CayleyGraph::label_letter(Generator(0)), "0");
    }
}
