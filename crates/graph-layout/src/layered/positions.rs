//! Coordinate assignment for ordered layers.
//!
//! Horizontal placement follows Brandes and Köpf: four block alignments
//! (upper/lower medians crossed with left/right priority) are compacted
//! independently and then balanced into one coordinate per vertex.

use crate::graph::Graph;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    LeftToRight,
    RightToLeft,
}

/// Everything the four passes share
struct Layering<'a, V> {
    graph: &'a Graph<V>,
    layers: &'a [Vec<V>],
    /// (layer, index in layer)
    place: HashMap<V, (usize, usize)>,
    widths: HashMap<V, f32>,
    /// Edges, as (upper, lower), that must not be aligned
    conflicts: HashSet<(V, V)>,
    node_separation: f32,
}

impl<'a, V> Layering<'a, V>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    fn new(
        graph: &'a Graph<V>,
        layers: &'a [Vec<V>],
        is_dummy: &dyn Fn(V) -> bool,
        node_separation: f32,
    ) -> Self {
        let place = layers
            .iter()
            .enumerate()
            .flat_map(|(l, layer)| layer.iter().enumerate().map(move |(i, &v)| (v, (l, i))))
            .collect();
        let widths = graph
            .nodes()
            .iter()
            .map(|&v| (v, graph.node(v).map_or(0.0, |n| n.width())))
            .collect();

        let mut layering = Self {
            graph,
            layers,
            place,
            widths,
            conflicts: HashSet::new(),
            node_separation,
        };
        layering.conflicts = layering.type1_conflicts(is_dummy);
        layering
    }

    fn index(&self, v: V) -> usize {
        self.place.get(&v).map_or(0, |&(_, i)| i)
    }

    /// Neighbours in the layer the alignment looks at, sorted by position
    fn adjacent(&self, v: V, vertical: Vertical) -> Vec<V> {
        let mut adjacent = match vertical {
            Vertical::Down => self.graph.predecessors_of(v).to_vec(),
            Vertical::Up => self.graph.successors_of(v).to_vec(),
        };
        adjacent.sort_by_key(|&u| self.index(u));
        adjacent
    }

    /// Segments crossing an inner segment (between two dummies). Inner
    /// segments win so that long edges stay straight.
    fn type1_conflicts(&self, is_dummy: &dyn Fn(V) -> bool) -> HashSet<(V, V)> {
        let mut conflicts = HashSet::new();
        let inner_upper = |v: V| -> Option<V> {
            if !is_dummy(v) {
                return None;
            }
            self.graph
                .predecessors_of(v)
                .iter()
                .copied()
                .find(|&u| is_dummy(u))
        };

        for pair in self.layers.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            let mut k0 = 0;
            let mut scanned = 0;
            for (l1, &v) in lower.iter().enumerate() {
                let inner = inner_upper(v);
                if l1 + 1 != lower.len() && inner.is_none() {
                    continue;
                }
                let k1 = inner.map_or(upper.len().saturating_sub(1), |u| self.index(u));
                for &w in &lower[scanned..=l1] {
                    for &u in self.graph.predecessors_of(w) {
                        let k = self.index(u);
                        if (k < k0 || k > k1) && !(is_dummy(u) && is_dummy(w)) {
                            conflicts.insert((u, w));
                        }
                    }
                }
                scanned = l1 + 1;
                k0 = k1;
            }
        }

        conflicts
    }

    fn is_conflict(&self, v: V, m: V, vertical: Vertical) -> bool {
        match vertical {
            Vertical::Down => self.conflicts.contains(&(m, v)),
            Vertical::Up => self.conflicts.contains(&(v, m)),
        }
    }

    fn ordered_layers(&self, vertical: Vertical) -> Vec<&'a [V]> {
        let layers = self.layers.iter().map(Vec::as_slice);
        match vertical {
            Vertical::Down => layers.collect(),
            Vertical::Up => layers.rev().collect(),
        }
    }

    /// Run one of the four passes and return a center x per vertex
    fn pass(&self, vertical: Vertical, horizontal: Horizontal) -> Pass<V> {
        let mut pass = Pass::new(self, horizontal);
        pass.align(self, vertical);
        pass.block_widths(self);
        pass.compact(self, vertical);
        pass
    }
}

/// State of a single alignment/compaction pass
struct Pass<V> {
    horizontal: Horizontal,
    root: HashMap<V, V>,
    align: HashMap<V, V>,
    sink: HashMap<V, V>,
    shift: HashMap<V, f32>,
    block_width: HashMap<V, f32>,
    x: HashMap<V, f32>,
}

impl<V> Pass<V>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    fn new(layering: &Layering<V>, horizontal: Horizontal) -> Self {
        let nodes = layering.graph.nodes();
        let identity = || nodes.iter().map(|&v| (v, v)).collect::<HashMap<_, _>>();
        let unset = match horizontal {
            Horizontal::LeftToRight => f32::INFINITY,
            Horizontal::RightToLeft => f32::NEG_INFINITY,
        };
        Self {
            horizontal,
            root: identity(),
            align: identity(),
            sink: identity(),
            shift: nodes.iter().map(|&v| (v, unset)).collect(),
            block_width: HashMap::new(),
            x: HashMap::new(),
        }
    }

    fn ltr(&self) -> bool {
        self.horizontal == Horizontal::LeftToRight
    }

    fn ordered<'l>(&self, layer: &'l [V]) -> Box<dyn Iterator<Item = &'l V> + 'l> {
        if self.ltr() {
            Box::new(layer.iter())
        } else {
            Box::new(layer.iter().rev())
        }
    }

    fn root(&self, v: V) -> V {
        self.root.get(&v).copied().unwrap_or(v)
    }

    fn sink(&self, v: V) -> V {
        self.sink.get(&v).copied().unwrap_or(v)
    }

    fn x(&self, v: V) -> f32 {
        self.x.get(&v).copied().unwrap_or(0.0)
    }

    /// Align each vertex with a median neighbour, forming vertical blocks
    fn align(&mut self, layering: &Layering<V>, vertical: Vertical) {
        for layer in layering.ordered_layers(vertical) {
            let mut r: i64 = if self.ltr() { -1 } else { i64::MAX };
            for &v in self.ordered(layer) {
                let adjacent = layering.adjacent(v, vertical);
                if adjacent.is_empty() {
                    continue;
                }
                let d = adjacent.len();
                let mut medians = vec![adjacent[(d - 1) / 2]];
                if d % 2 == 0 {
                    medians.push(adjacent[d / 2]);
                }
                if !self.ltr() {
                    medians.reverse();
                }

                for m in medians {
                    let pos = layering.index(m) as i64;
                    let ordered = if self.ltr() { r < pos } else { r > pos };
                    if self.align[&v] == v && ordered && !layering.is_conflict(v, m, vertical) {
                        let root = self.root(m);
                        self.align.insert(m, v);
                        self.root.insert(v, root);
                        self.align.insert(v, root);
                        r = pos;
                    }
                }
            }
        }
    }

    fn block_widths(&mut self, layering: &Layering<V>) {
        for &v in layering.graph.nodes() {
            let width = layering.widths.get(&v).copied().unwrap_or(0.0);
            let root = self.root(v);
            let block = self.block_width.entry(root).or_insert(0.0);
            *block = block.max(width);
        }
    }

    /// Neighbour of `v` in its layer on the side the pass packs towards
    fn packed_neighbour(&self, layering: &Layering<V>, v: V) -> Option<V> {
        let &(l, i) = layering.place.get(&v)?;
        let layer = &layering.layers[l];
        if self.ltr() {
            i.checked_sub(1).map(|j| layer[j])
        } else {
            layer.get(i + 1).copied()
        }
    }

    fn compact(&mut self, layering: &Layering<V>, vertical: Vertical) {
        for layer in layering.ordered_layers(vertical) {
            for &v in self.ordered(layer) {
                if self.root(v) == v {
                    self.place_block(layering, v);
                }
            }
        }

        // accumulate class shifts along the first vertex of each layer
        let mut d = 0.0;
        for layer in layering.ordered_layers(vertical) {
            let Some(&v) = self.ordered(layer).next() else {
                continue;
            };
            if v != self.sink(self.root(v)) {
                continue;
            }
            let old = self.shift[&v];
            if old.is_finite() {
                self.shift.insert(v, old + d);
                d += old;
            } else {
                self.shift.insert(v, 0.0);
            }
        }

        for &v in layering.graph.nodes() {
            let root = self.root(v);
            let mut x = self.x(root);
            let shift = self.shift[&self.sink(root)];
            if shift.is_finite() {
                x += shift;
            }
            self.x.insert(v, x);
        }
    }

    /// Place the block rooted at `v` after every block it is packed against
    fn place_block(&mut self, layering: &Layering<V>, v: V) {
        if self.x.contains_key(&v) {
            return;
        }
        self.x.insert(v, 0.0);

        // (block root, block member being checked)
        let mut stack = vec![(v, v)];
        while let Some(&(v, w)) = stack.last() {
            if let Some(u) = self.packed_neighbour(layering, w).map(|n| self.root(n)) {
                if !self.x.contains_key(&u) {
                    self.x.insert(u, 0.0);
                    stack.push((u, u));
                    continue;
                }
                self.separate(layering, v, u);
            }

            let next = self.align.get(&w).copied().unwrap_or(v);
            match stack.last_mut() {
                Some(frame) if next != v => frame.1 = next,
                _ => {
                    stack.pop();
                }
            }
        }
    }

    /// Keep block `v` clear of its already placed neighbour block `u`
    fn separate(&mut self, layering: &Layering<V>, v: V, u: V) {
        if self.sink(v) == v {
            let sink = self.sink(u);
            self.sink.insert(v, sink);
        }

        let gap = layering.node_separation
            + 0.5 * (self.block_width[&u] + self.block_width[&v]);
        let (xu, xv) = (self.x(u), self.x(v));

        if self.sink(v) != self.sink(u) {
            let sink = self.sink(u);
            let shift = self.shift[&sink];
            let shift = if self.ltr() {
                shift.min(xv - xu - gap)
            } else {
                shift.max(xv - xu + gap)
            };
            self.shift.insert(sink, shift);
        } else {
            let x = if self.ltr() {
                xv.max(xu + gap)
            } else {
                xv.min(xu - gap)
            };
            self.x.insert(v, x);
        }
    }

    /// Leftmost and rightmost extent of the pass' drawing
    fn span(&self, layering: &Layering<V>) -> (f32, f32) {
        layering.graph.nodes().iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), &v| {
                let half = 0.5 * self.block_width.get(&self.root(v)).copied().unwrap_or(0.0);
                (min.min(self.x(v) - half), max.max(self.x(v) + half))
            },
        )
    }
}

/// Compute a horizontal center for every vertex of the layered graph
///
/// Left-to-right passes are aligned to the left border of the narrowest
/// pass, right-to-left passes to its right border. Each vertex then takes
/// the average of its two median candidates.
pub(super) fn assign_x<V>(
    graph: &Graph<V>,
    layers: &[Vec<V>],
    is_dummy: &dyn Fn(V) -> bool,
    node_separation: f32,
) -> HashMap<V, f32>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let layering = Layering::new(graph, layers, is_dummy, node_separation);
    let mut passes = [
        layering.pass(Vertical::Down, Horizontal::LeftToRight),
        layering.pass(Vertical::Down, Horizontal::RightToLeft),
        layering.pass(Vertical::Up, Horizontal::LeftToRight),
        layering.pass(Vertical::Up, Horizontal::RightToLeft),
    ];

    let spans: Vec<(f32, f32)> = passes.iter().map(|p| p.span(&layering)).collect();
    let narrowest = (0..spans.len())
        .min_by(|&a, &b| {
            let width = |i: usize| spans[i].1 - spans[i].0;
            width(a).total_cmp(&width(b))
        })
        .unwrap_or(0);

    for (i, pass) in passes.iter_mut().enumerate() {
        let diff = if pass.ltr() {
            spans[i].0 - spans[narrowest].0
        } else {
            spans[i].1 - spans[narrowest].1
        };
        for x in pass.x.values_mut() {
            *x -= diff;
        }
    }

    graph
        .nodes()
        .iter()
        .map(|&v| {
            let mut candidates = passes.each_ref().map(|p| p.x(v));
            candidates.sort_by(f32::total_cmp);
            (v, 0.5 * (candidates[1] + candidates[2]))
        })
        .collect()
}

/// Compute the top y of every layer
///
/// Consecutive layers are `level_separation` apart plus half the height of
/// both, a layer's height being that of its tallest real vertex.
pub(super) fn assign_y<V>(
    graph: &Graph<V>,
    layers: &[Vec<V>],
    is_dummy: &dyn Fn(V) -> bool,
    level_separation: f32,
) -> Vec<f32>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let heights: Vec<f32> = layers
        .iter()
        .map(|layer| {
            layer
                .iter()
                .filter(|&&v| !is_dummy(v))
                .filter_map(|&v| graph.node(v).map(|n| n.height()))
                .fold(0.0, f32::max)
        })
        .collect();

    let mut y = 0.0;
    let mut tops = Vec::with_capacity(layers.len());
    for (i, height) in heights.iter().enumerate() {
        tops.push(y);
        if let Some(next) = heights.get(i + 1) {
            y += level_separation + 0.5 * (height + next);
        }
    }
    tops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use test_log::test;

    fn sized(edges: &[(u32, u32)]) -> Graph<u32> {
        let mut graph = Graph::new();
        graph.add_edges(edges.iter().copied());
        graph.measure(&|_: u32| Size::new(50.0, 20.0));
        graph
    }

    fn no_dummies(_: u32) -> bool {
        false
    }

    #[test]
    fn parallel_edges_stack_vertically() {
        let graph = sized(&[(1, 2), (3, 4)]);
        let layers = vec![vec![1, 3], vec![2, 4]];
        let x = assign_x(&graph, &layers, &no_dummies, 100.0);

        assert_eq!(x[&1], x[&2]);
        assert_eq!(x[&3], x[&4]);
        assert_eq!(x[&3] - x[&1], 150.0);
    }

    #[test]
    fn same_layer_vertices_keep_their_gap() {
        let graph = sized(&[(1, 2), (1, 3), (1, 4), (2, 5), (3, 5), (4, 5)]);
        let layers = vec![vec![1], vec![2, 3, 4], vec![5]];
        let x = assign_x(&graph, &layers, &no_dummies, 100.0);

        assert!(x[&3] - x[&2] >= 150.0 - 1e-3);
        assert!(x[&4] - x[&3] >= 150.0 - 1e-3);
        // the fan is symmetric
        assert!((x[&1] - x[&3]).abs() < 1e-3);
        assert!((x[&5] - x[&3]).abs() < 1e-3);
    }

    #[test]
    fn layer_tops_use_the_tallest_vertex() {
        let mut graph = sized(&[(1, 2), (2, 3)]);
        graph.set_node_size(2, Size::new(50.0, 60.0)).unwrap();
        let tops = assign_y(&graph, &[vec![1], vec![2], vec![3]], &no_dummies, 100.0);

        assert_eq!(tops, vec![0.0, 140.0, 280.0]);
    }
}
