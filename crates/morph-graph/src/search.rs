//! Shortest-path search
//!
//! Breadth-first search when every edge has unit cost, Dijkstra otherwise.
//! Both visit outgoing edges in registration order and only replace a
//! discovered route with a strictly cheaper one, so equal-cost ties go to the
//! earliest-registered adapter.

use crate::graph::ResolutionGraph;
use crate::path::Step;
use morph_type::TypeIdentity;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

type Parents = Vec<Option<(NodeIndex, EdgeIndex)>>;

/// Find the cheapest step sequence, `None` if unreachable
pub(crate) fn shortest_path(
    graph: &ResolutionGraph,
    from: &TypeIdentity,
    into: &TypeIdentity,
) -> Option<Vec<Step>> {
    let start = graph.node(from)?;
    let goal = graph.node(into)?;

    let parents = if graph.has_custom_costs() {
        dijkstra(graph, start, goal)?
    } else {
        breadth_first(graph, start, goal)?
    };

    Some(trace_back(graph, &parents, start, goal))
}

fn breadth_first(graph: &ResolutionGraph, start: NodeIndex, goal: NodeIndex) -> Option<Parents> {
    let mut parents: Parents = vec![None; graph.node_count()];
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::from([start]);
    visited[start.index()] = true;

    while let Some(node) = queue.pop_front() {
        if node == goal {
            return Some(parents);
        }
        for &(edge, next) in graph.outgoing(node) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                parents[next.index()] = Some((node, edge));
                queue.push_back(next);
            }
        }
    }

    None
}

fn dijkstra(graph: &ResolutionGraph, start: NodeIndex, goal: NodeIndex) -> Option<Parents> {
    let mut parents: Parents = vec![None; graph.node_count()];
    let mut best: Vec<Option<u64>> = vec![None; graph.node_count()];
    let mut settled = vec![false; graph.node_count()];

    // (cost, discovery order, node): equal costs pop in discovery order
    let mut heap = BinaryHeap::new();
    let mut discovered = 0_u64;
    best[start.index()] = Some(0);
    heap.push(Reverse((0_u64, discovered, start.index())));

    while let Some(Reverse((cost, _, index))) = heap.pop() {
        if settled[index] {
            continue;
        }
        settled[index] = true;

        let node = NodeIndex::new(index);
        if node == goal {
            return Some(parents);
        }

        for &(edge, next) in graph.outgoing(node) {
            let candidate = cost + u64::from(graph.step(edge).cost());
            let improves = best[next.index()].map_or(true, |known| candidate < known);
            if improves && !settled[next.index()] {
                best[next.index()] = Some(candidate);
                parents[next.index()] = Some((node, edge));
                discovered += 1;
                heap.push(Reverse((candidate, discovered, next.index())));
            }
        }
    }

    None
}

fn trace_back(graph: &ResolutionGraph, parents: &Parents, start: NodeIndex, goal: NodeIndex) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut node = goal;
    while node != start {
        let Some((previous, edge)) = parents[node.index()] else {
            break;
        };
        steps.push(graph.step(edge).clone());
        node = previous;
    }
    steps.reverse();
    steps
}
