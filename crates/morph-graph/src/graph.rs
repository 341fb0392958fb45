//! Resolution graph
//!
//! Immutable adjacency view built from one registry snapshot. Nodes are type
//! identities, edges are [`Step`]s: every adapter contributes a forward edge,
//! and adapters with a backward transformation also contribute a reverse edge.

use crate::path::Step;
use morph_adapter::RegistrySnapshot;
use morph_type::TypeIdentity;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::HashMap;
use std::sync::Arc;

/// Graph over type identities, tied to one registry version
#[derive(Debug, Default)]
pub struct ResolutionGraph {
    version: u64,
    graph: DiGraph<TypeIdentity, Step>,
    index: HashMap<TypeIdentity, NodeIndex>,

    /// Per node, outgoing edges ordered by (registration slot, forward first)
    outgoing: Vec<Vec<(EdgeIndex, NodeIndex)>>,

    custom_costs: bool,
}

impl ResolutionGraph {
    /// Empty graph at version 0
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build graph from a registry snapshot
    #[must_use]
    pub fn build(snapshot: &RegistrySnapshot) -> Self {
        let mut this = Self {
            version: snapshot.version(),
            ..Self::default()
        };

        // Slot order is preserved per node because edges are appended in it
        for adapter in snapshot.adapters() {
            this.insert(Step::forward(Arc::clone(adapter)));
            if let Some(reverse) = Step::backward(Arc::clone(adapter)) {
                this.insert(reverse);
            }
            this.custom_costs |= adapter.has_custom_cost();
        }

        tracing::debug!(
            version = this.version,
            nodes = this.node_count(),
            edges = this.edge_count(),
            custom_costs = this.custom_costs,
            "resolution graph built"
        );

        this
    }

    fn insert(&mut self, step: Step) {
        let from = self.node_or_insert(step.from());
        let into = self.node_or_insert(Step::into(&step));
        let edge = self.graph.add_edge(from, into, step);
        self.outgoing[from.index()].push((edge, into));
    }

    fn node_or_insert(&mut self, ty: &TypeIdentity) -> NodeIndex {
        if let Some(&node) = self.index.get(ty) {
            return node;
        }
        let node = self.graph.add_node(ty.clone());
        self.index.insert(ty.clone(), node);
        self.outgoing.push(Vec::new());
        node
    }

    /// Registry version this graph was built from
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of distinct type identities
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, reverse edges included
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if an identity appears in any adapter
    #[inline]
    #[must_use]
    pub fn contains(&self, ty: &TypeIdentity) -> bool {
        self.index.contains_key(ty)
    }

    /// Whether any adapter declares a non-default cost
    #[inline]
    #[must_use]
    pub fn has_custom_costs(&self) -> bool {
        self.custom_costs
    }

    /// Outgoing steps of an identity, in tie-break order
    pub fn neighbours<'a>(&'a self, ty: &TypeIdentity) -> impl Iterator<Item = &'a Step> + 'a {
        self.index
            .get(ty)
            .map(|node| self.outgoing[node.index()].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&(edge, _)| &self.graph[edge])
    }

    pub(crate) fn node(&self, ty: &TypeIdentity) -> Option<NodeIndex> {
        self.index.get(ty).copied()
    }

    pub(crate) fn outgoing(&self, node: NodeIndex) -> &[(EdgeIndex, NodeIndex)] {
        &self.outgoing[node.index()]
    }

    pub(crate) fn step(&self, edge: EdgeIndex) -> &Step {
        &self.graph[edge]
    }
}
