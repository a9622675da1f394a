//! Directed graph store shared by every layout engine.
//!
//! Nodes are identified by their key `N` (an id, a handle, a small string
//! slice...), the same way petgraph's `GraphMap` identifies them. Each node
//! carries the geometry a layout reads and writes: a size assigned by the host
//! and a position assigned by the layout.

mod visit;

use crate::edges::EdgeBounds;
use crate::{NodeSizes, Point, Rect, Size, Vec2};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised by structural graph operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError<N>
where
    N: fmt::Debug,
{
    /// The node is not a member of the graph
    #[error("unable to find node {0:?} in graph")]
    NodeNotFound(N),

    /// A positional lookup went past the node count
    #[error("position {index} is out of range for a graph of {len} nodes")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A directed edge, equal to any other edge with the same endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    pub source: N,
    pub destination: N,
}

impl<N> Edge<N> {
    pub fn new(source: N, destination: N) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Geometry of a node: size set by the host, position set by a layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Node {
    position: Point,
    size: Size,
}

impl Node {
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

/// Structural change notification sent to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent<N> {
    NodeAdded(N),
    NodeRemoved(N),
    EdgeAdded(Edge<N>),
    EdgeRemoved(Edge<N>),
}

type Observer<N> = Box<dyn FnMut(&GraphEvent<N>)>;

#[derive(Debug, Clone)]
struct Entry<N> {
    node: Node,
    outgoing: Vec<N>,
    incoming: Vec<N>,
}

impl<N> Default for Entry<N> {
    fn default() -> Self {
        Self {
            node: Node::default(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }
}

/// Insertion ordered directed graph with an adjacency index
pub struct Graph<N> {
    order: Vec<N>,
    entries: HashMap<N, Entry<N>>,
    edges: Vec<Edge<N>>,
    observers: Vec<Observer<N>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            edges: Vec::new(),
            observers: Vec::new(),
        }
    }
}

/// Cloning copies the structure and geometry; observers are not carried over.
impl<N: Clone> Clone for Graph<N> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            entries: self.entries.clone(),
            edges: self.edges.clone(),
            observers: Vec::new(),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.order)
            .field("edges", &self.edges)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<N> Graph<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_nodes(&self) -> bool {
        !self.order.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[N] {
        &self.order
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    pub fn contains_node(&self, node: N) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn contains_edge(&self, source: N, destination: N) -> bool {
        self.successors_of(source).contains(&destination)
    }

    /// Register a callback invoked after every structural change
    pub fn subscribe(&mut self, observer: impl FnMut(&GraphEvent<N>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: GraphEvent<N>) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Add a node, returns false if it was already present
    pub fn add_node(&mut self, node: N) -> bool {
        if self.entries.contains_key(&node) {
            return false;
        }
        self.entries.insert(node, Entry::default());
        self.order.push(node);
        self.notify(GraphEvent::NodeAdded(node));
        true
    }

    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        for node in nodes {
            self.add_node(node);
        }
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, node: N) -> Result<(), GraphError<N>> {
        let entry = self
            .entries
            .remove(&node)
            .ok_or(GraphError::NodeNotFound(node))?;
        self.order.retain(|&n| n != node);

        for &succ in &entry.outgoing {
            if let Some(e) = self.entries.get_mut(&succ) {
                e.incoming.retain(|&n| n != node);
            }
        }
        for &pred in &entry.incoming {
            if let Some(e) = self.entries.get_mut(&pred) {
                e.outgoing.retain(|&n| n != node);
            }
        }

        let mut removed = Vec::new();
        self.edges.retain(|edge| {
            let touches = edge.source == node || edge.destination == node;
            if touches {
                removed.push(*edge);
            }
            !touches
        });

        for edge in removed {
            self.notify(GraphEvent::EdgeRemoved(edge));
        }
        self.notify(GraphEvent::NodeRemoved(node));
        Ok(())
    }

    pub fn remove_nodes(
        &mut self,
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<(), GraphError<N>> {
        for node in nodes {
            self.remove_node(node)?;
        }
        Ok(())
    }

    /// Remove a node and everything reachable from it through successor
    /// edges. Returns the removed nodes, descendants first.
    pub fn remove_subtree(&mut self, root: N) -> Result<Vec<N>, GraphError<N>> {
        if !self.contains_node(root) {
            return Err(GraphError::NodeNotFound(root));
        }

        let mut seen = HashSet::from([root]);
        let mut reached = vec![root];
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for &succ in self.successors_of(node) {
                if seen.insert(succ) {
                    reached.push(succ);
                    stack.push(succ);
                }
            }
        }

        reached.reverse();
        for &node in &reached {
            self.remove_node(node)?;
        }
        Ok(reached)
    }

    /// Add an edge, inserting missing endpoints first. Adding an edge that is
    /// already present leaves the graph unchanged.
    pub fn add_edge(&mut self, source: N, destination: N) -> Edge<N> {
        self.add_node(source);
        self.add_node(destination);

        let edge = Edge::new(source, destination);
        if self.contains_edge(source, destination) {
            return edge;
        }

        self.edges.push(edge);
        if let Some(e) = self.entries.get_mut(&source) {
            e.outgoing.push(destination);
        }
        if let Some(e) = self.entries.get_mut(&destination) {
            e.incoming.push(source);
        }
        self.notify(GraphEvent::EdgeAdded(edge));
        edge
    }

    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = (N, N)>) {
        for (source, destination) in edges {
            self.add_edge(source, destination);
        }
    }

    /// Remove an edge, returns whether it was present
    pub fn remove_edge(&mut self, edge: Edge<N>) -> bool {
        self.remove_edge_between(edge.source, edge.destination)
    }

    pub fn remove_edge_between(&mut self, source: N, destination: N) -> bool {
        let Some(index) = self
            .edges
            .iter()
            .position(|e| e.source == source && e.destination == destination)
        else {
            return false;
        };

        let edge = self.edges.remove(index);
        if let Some(e) = self.entries.get_mut(&source) {
            e.outgoing.retain(|&n| n != destination);
        }
        if let Some(e) = self.entries.get_mut(&destination) {
            e.incoming.retain(|&n| n != source);
        }
        self.notify(GraphEvent::EdgeRemoved(edge));
        true
    }

    /// Node at the given insertion position
    pub fn node_at(&self, index: usize) -> Result<N, GraphError<N>> {
        self.order
            .get(index)
            .copied()
            .ok_or(GraphError::IndexOutOfBounds {
                index,
                len: self.order.len(),
            })
    }

    pub fn edge_between(&self, source: N, destination: N) -> Option<Edge<N>> {
        self.contains_edge(source, destination)
            .then(|| Edge::new(source, destination))
    }

    /// Destinations of the node's outgoing edges, in edge insertion order
    pub fn successors_of(&self, node: N) -> &[N] {
        self.entries
            .get(&node)
            .map(|e| e.outgoing.as_slice())
            .unwrap_or(&[])
    }

    /// Sources of the node's incoming edges, in edge insertion order
    pub fn predecessors_of(&self, node: N) -> &[N] {
        self.entries
            .get(&node)
            .map(|e| e.incoming.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_successor(&self, node: N) -> bool {
        !self.successors_of(node).is_empty()
    }

    pub fn has_predecessor(&self, node: N) -> bool {
        !self.predecessors_of(node).is_empty()
    }

    pub fn out_edges(&self, node: N) -> impl Iterator<Item = Edge<N>> + '_ {
        self.successors_of(node).iter().map(move |&d| Edge::new(node, d))
    }

    pub fn in_edges(&self, node: N) -> impl Iterator<Item = Edge<N>> + '_ {
        self.predecessors_of(node).iter().map(move |&s| Edge::new(s, node))
    }

    pub fn node(&self, node: N) -> Option<&Node> {
        self.entries.get(&node).map(|e| &e.node)
    }

    pub fn node_mut(&mut self, node: N) -> Option<&mut Node> {
        self.entries.get_mut(&node).map(|e| &mut e.node)
    }

    pub fn set_node_size(&mut self, node: N, size: Size) -> Result<(), GraphError<N>> {
        self.node_mut(node)
            .ok_or(GraphError::NodeNotFound(node))?
            .set_size(size);
        Ok(())
    }

    /// Assign every node's size from the given provider
    pub fn measure<S>(&mut self, sizes: &S)
    where
        S: NodeSizes<N>,
    {
        for (&key, entry) in self.entries.iter_mut() {
            entry.node.set_size(sizes.size(key));
        }
    }

    pub fn position(&self, node: N) -> Option<Point> {
        self.node(node).map(Node::position)
    }

    /// Move every node by the given offset
    pub fn translate(&mut self, offset: Vec2) {
        for entry in self.entries.values_mut() {
            entry.node.translate(offset);
        }
    }

    /// Union of every node's bounding box
    pub fn bounds(&self) -> Option<Rect> {
        self.order
            .iter()
            .filter_map(|n| self.node(*n))
            .map(Node::bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Size of the bounding box of all nodes, zero for an empty graph
    pub fn layout_size(&self) -> Size {
        self.bounds().map(|r| r.size()).unwrap_or(Size::zero())
    }

    /// The topmost node whose box contains the point. Nodes added later are
    /// drawn over earlier ones.
    pub fn node_at_point(&self, point: Point) -> Option<N> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&n| self.node(n).is_some_and(|node| node.bounds().contains(point)))
    }

    /// Source and destination boxes of every edge, in edge order
    pub fn edge_bounds(&self) -> Vec<EdgeBounds> {
        self.edges
            .iter()
            .filter_map(|edge| {
                Some(EdgeBounds {
                    source: self.node(edge.source)?.bounds(),
                    destination: self.node(edge.destination)?.bounds(),
                })
            })
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use test_log::test;

    #[test]
    fn add_edge_inserts_endpoints_once() {
        let mut graph = Graph::new();
        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(1, 2);

        assert_eq!(graph.nodes(), &[1, 2, 3]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors_of(1), &[2, 3]);
        assert_eq!(graph.predecessors_of(3), &[1]);
        assert!(graph.has_successor(1));
        assert!(!graph.has_predecessor(1));
    }

    #[test]
    fn remove_node_drops_incident_edges_only() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 3), (3, 4), (1, 4)]);

        graph.remove_node(2).unwrap();

        assert_eq!(graph.nodes(), &[1, 3, 4]);
        assert_eq!(graph.edges(), &[Edge::new(3, 4), Edge::new(1, 4)]);
        assert!(graph.predecessors_of(3).is_empty());
        assert_eq!(graph.successors_of(1), &[4]);
    }

    #[test]
    fn remove_missing_node_fails() {
        let mut graph: Graph<u32> = Graph::new();
        graph.add_node(1);
        assert_eq!(graph.remove_node(7), Err(GraphError::NodeNotFound(7)));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn remove_subtree_cascades() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)]);

        let removed = graph.remove_subtree(2).unwrap();

        assert_eq!(removed.len(), 3);
        assert_eq!(graph.nodes(), &[1, 3, 6]);
        assert_eq!(graph.edges(), &[Edge::new(1, 3), Edge::new(3, 6)]);
    }

    #[test]
    fn remove_subtree_terminates_on_cycles() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 3), (3, 1), (0, 1)]);

        graph.remove_subtree(1).unwrap();

        assert_eq!(graph.nodes(), &[0]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn node_at_checks_range() {
        let mut graph = Graph::new();
        graph.add_nodes(["a", "b"]);
        assert_eq!(graph.node_at(1), Ok("b"));
        assert_eq!(
            graph.node_at(2),
            Err(GraphError::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn edge_between_and_removal() {
        let mut graph = Graph::new();
        let edge = graph.add_edge('a', 'b');
        assert_eq!(graph.edge_between('a', 'b'), Some(edge));
        assert_eq!(graph.edge_between('b', 'a'), None);
        assert!(graph.remove_edge(edge));
        assert!(!graph.remove_edge(edge));
        assert!(graph.successors_of('a').is_empty());
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn observers_see_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut graph = Graph::new();
        let sink = events.clone();
        graph.subscribe(move |event| sink.borrow_mut().push(*event));

        graph.add_edge(1, 2);
        graph.add_edge(1, 2);
        graph.remove_node(1).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                GraphEvent::NodeAdded(1),
                GraphEvent::NodeAdded(2),
                GraphEvent::EdgeAdded(Edge::new(1, 2)),
                GraphEvent::EdgeRemoved(Edge::new(1, 2)),
                GraphEvent::NodeRemoved(1),
            ]
        );
    }

    #[test]
    fn measure_and_hit_test() {
        let mut graph = Graph::new();
        graph.add_edge(1, 2);
        let sizes: HashMap<u32, Size> = [(1, Size::new(10.0, 10.0))].into();
        graph.measure(&sizes);
        assert_eq!(graph.node(1).unwrap().size(), Size::new(10.0, 10.0));
        assert_eq!(graph.node(2).unwrap().size(), Size::zero());

        graph.measure(&|_: u32| Size::new(20.0, 5.0));
        graph
            .node_mut(2)
            .unwrap()
            .set_position(Point::new(100.0, 0.0));

        assert_eq!(graph.node_at_point(Point::new(5.0, 2.0)), Some(1));
        assert_eq!(graph.node_at_point(Point::new(110.0, 4.0)), Some(2));
        assert_eq!(graph.node_at_point(Point::new(50.0, 4.0)), None);
        assert_eq!(graph.layout_size(), Size::new(120.0, 5.0));
    }

    #[test]
    fn acyclic_check_uses_petgraph() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 3)]);
        assert!(graph.is_acyclic());
        graph.add_edge(3, 1);
        assert!(!graph.is_acyclic());
    }

    #[test]
    fn clone_keeps_structure() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 3)]);
        graph.subscribe(|_| {});
        let copy = graph.clone();
        assert_eq!(copy.nodes(), graph.nodes());
        assert_eq!(copy.edges(), graph.edges());
    }
}
