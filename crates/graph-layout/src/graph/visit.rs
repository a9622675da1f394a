//! petgraph visitor traits, so petgraph's algorithms run directly on a
//! [`Graph`].

use super::{Edge, Graph};
use petgraph::visit::{
    GraphBase, IntoNeighbors, IntoNeighborsDirected, IntoNodeIdentifiers, NodeCount, Visitable,
};
use petgraph::Direction;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::iter::Copied;
use std::slice::Iter;

impl<N> GraphBase for Graph<N>
where
    N: Copy + PartialEq,
{
    type NodeId = N;
    type EdgeId = Edge<N>;
}

impl<'a, N> IntoNeighbors for &'a Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    type Neighbors = Copied<Iter<'a, N>>;

    fn neighbors(self, node: N) -> Self::Neighbors {
        self.successors_of(node).iter().copied()
    }
}

impl<'a, N> IntoNeighborsDirected for &'a Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    type NeighborsDirected = Copied<Iter<'a, N>>;

    fn neighbors_directed(self, node: N, direction: Direction) -> Self::NeighborsDirected {
        match direction {
            Direction::Outgoing => self.successors_of(node).iter().copied(),
            Direction::Incoming => self.predecessors_of(node).iter().copied(),
        }
    }
}

impl<'a, N> IntoNodeIdentifiers for &'a Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    type NodeIdentifiers = Copied<Iter<'a, N>>;

    fn node_identifiers(self) -> Self::NodeIdentifiers {
        self.nodes().iter().copied()
    }
}

impl<N> NodeCount for Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }
}

impl<N> Visitable for Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    type Map = HashSet<N>;

    fn visit_map(&self) -> HashSet<N> {
        HashSet::with_capacity(Graph::node_count(self))
    }

    fn reset_map(&self, map: &mut HashSet<N>) {
        map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::algo::toposort;
    use test_log::test;

    #[test]
    fn toposort_follows_edges() {
        let mut graph = Graph::new();
        graph.add_edges([("c", "d"), ("a", "b"), ("b", "c")]);

        let order = toposort(&graph, None).unwrap();
        let index = |n| order.iter().position(|&m| m == n).unwrap();
        assert!(index("a") < index("b"));
        assert!(index("b") < index("c"));
        assert!(index("c") < index("d"));
    }

    #[test]
    fn neighbors_directed_matches_adjacency() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (3, 2), (2, 4)]);

        let incoming: Vec<_> = (&graph).neighbors_directed(2, Direction::Incoming).collect();
        let outgoing: Vec<_> = (&graph).neighbors(2).collect();
        assert_eq!(incoming, vec![1, 3]);
        assert_eq!(outgoing, vec![4]);
    }
}
