use super::Vertex;
use crate::graph::Graph;
use crate::Size;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use tracing::warn;

/// Assign layers to nodes by repeatedly stripping the nodes without
/// incoming edges
///
/// Each layer keeps the graph's insertion order. The graph must be acyclic;
/// anything left over is put in a final layer.
pub(super) fn assign_layers<V>(graph: &Graph<V>) -> Vec<Vec<V>>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let mut in_degree: HashMap<V, usize> = graph
        .nodes()
        .iter()
        .map(|&n| (n, graph.predecessors_of(n).len()))
        .collect();
    let mut assigned = HashSet::new();
    let mut layers: Vec<Vec<V>> = Vec::new();

    loop {
        let roots: Vec<V> = graph
            .nodes()
            .iter()
            .copied()
            .filter(|n| !assigned.contains(n) && in_degree[n] == 0)
            .collect();
        if roots.is_empty() {
            break;
        }

        for &root in &roots {
            assigned.insert(root);
            for successor in graph.successors_of(root) {
                if let Some(degree) = in_degree.get_mut(successor) {
                    *degree = degree.saturating_sub(1);
                }
            }
        }
        layers.push(roots);
    }

    let leftover: Vec<V> = graph
        .nodes()
        .iter()
        .copied()
        .filter(|n| !assigned.contains(n))
        .collect();
    if !leftover.is_empty() {
        warn!("{} nodes are part of a cycle and share the last layer", leftover.len());
        layers.push(leftover);
    }

    layers
}

/// Split every edge spanning more than one layer into a chain of unit
/// edges through dummy vertices, one per crossed layer.
///
/// Dummies take the width of the edge's source and no height. Returns the
/// number of dummies created.
pub(super) fn insert_dummies<N>(
    graph: &mut Graph<Vertex<N>>,
    layers: &mut [Vec<Vertex<N>>],
) -> usize
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let layer_of: HashMap<Vertex<N>, usize> = layers
        .iter()
        .enumerate()
        .flat_map(|(index, layer)| layer.iter().map(move |&v| (v, index)))
        .collect();

    let mut dummies = 0;
    for edge in graph.edges().to_vec() {
        let (Some(&from), Some(&to)) = (layer_of.get(&edge.source), layer_of.get(&edge.destination))
        else {
            continue;
        };
        if to <= from + 1 {
            continue;
        }

        let width = graph.node(edge.source).map_or(0.0, |n| n.width());
        graph.remove_edge(edge);
        let mut previous = edge.source;
        for layer in &mut layers[from + 1..to] {
            let dummy = Vertex::Dummy(dummies);
            dummies += 1;
            graph.add_edge(previous, dummy);
            if let Some(node) = graph.node_mut(dummy) {
                node.set_size(Size::new(width, 0.0));
            }
            layer.push(dummy);
            previous = dummy;
        }
        graph.add_edge(previous, edge.destination);
    }

    dummies
}
