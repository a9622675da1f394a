//! Buchheim–Walker node placement on an arena view of the tree.

use super::BuchheimWalkerConfig;
use crate::graph::Graph;
use crate::{Point, Size};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Arena view of the spanning tree reachable from the root.
///
/// A node discovered through several parents belongs to the first one only,
/// which also makes the view safe on graphs with cycles.
#[derive(Debug)]
pub(super) struct TreeView<N> {
    pub keys: Vec<N>,
    pub sizes: Vec<Size>,
    pub depths: Vec<usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// 1-based rank among siblings, 0 for the root
    numbers: Vec<usize>,
}

impl<N> TreeView<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    pub fn build(graph: &Graph<N>, root: N) -> Self {
        let mut view = Self {
            keys: Vec::new(),
            sizes: Vec::new(),
            depths: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            numbers: Vec::new(),
        };
        let mut seen = HashSet::from([root]);
        view.push(graph, root, None, 0);

        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            let key = view.keys[index];
            for &successor in graph.successors_of(key) {
                if !seen.insert(successor) {
                    continue;
                }
                let number = view.children[index].len() + 1;
                let child = view.push(graph, successor, Some(index), number);
                view.children[index].push(child);
                stack.push(child);
            }
        }

        view
    }

    fn push(&mut self, graph: &Graph<N>, key: N, parent: Option<usize>, number: usize) -> usize {
        let index = self.keys.len();
        self.keys.push(key);
        self.sizes
            .push(graph.node(key).map(|n| n.size()).unwrap_or_default());
        self.depths
            .push(parent.map(|p| self.depths[p] + 1).unwrap_or(0));
        self.parents.push(parent);
        self.children.push(Vec::new());
        self.numbers.push(number);
        index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Smallest width and height over all nodes, independently
    pub fn min_size(&self) -> Size {
        self.sizes
            .iter()
            .copied()
            .reduce(|a, b| Size::new(a.width.min(b.width), a.height.min(b.height)))
            .unwrap_or_default()
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let siblings = &self.children[self.parents[v]?];
        let rank = self.numbers[v];
        (rank > 1).then(|| siblings[rank - 2])
    }

    fn leftmost_sibling(&self, v: usize) -> Option<usize> {
        self.children[self.parents[v]?].first().copied()
    }

    fn is_sibling(&self, a: usize, b: usize) -> bool {
        self.parents[a].is_some() && self.parents[a] == self.parents[b]
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    ancestor: usize,
    thread: Option<usize>,
    prelim: f32,
    modifier: f32,
    shift: f32,
    change: f32,
}

pub(super) struct Walker<'a, N> {
    tree: &'a TreeView<N>,
    config: &'a BuchheimWalkerConfig,
    data: Vec<NodeData>,
}

impl<'a, N> Walker<'a, N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new(tree: &'a TreeView<N>, config: &'a BuchheimWalkerConfig) -> Self {
        let data = (0..tree.len())
            .map(|index| NodeData {
                ancestor: index,
                thread: None,
                prelim: 0.0,
                modifier: 0.0,
                shift: 0.0,
                change: 0.0,
            })
            .collect();
        Self { tree, config, data }
    }

    /// Node dimension along the sibling axis
    fn extent(&self, v: usize) -> f32 {
        let size = self.tree.sizes[v];
        if self.config.orientation.is_vertical() {
            size.width
        } else {
            size.height
        }
    }

    fn spacing(&self, left: usize, right: usize) -> f32 {
        let separation = if self.tree.is_sibling(left, right) {
            self.config.sibling_separation
        } else {
            self.config.subtree_separation
        };
        separation + self.extent(left)
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.tree.children[v].first().copied().or(self.data[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.tree.children[v].last().copied().or(self.data[v].thread)
    }

    /// Post-order pass computing preliminary x coordinates and modifiers
    pub fn first_walk(&mut self) {
        if self.tree.len() == 0 {
            return;
        }

        // (node, next child to visit, default ancestor for the apportion calls)
        let mut stack: Vec<(usize, usize, Option<usize>)> = vec![(0, 0, None)];
        while let Some(frame) = stack.last_mut() {
            let (v, next, _) = *frame;
            if let Some(&child) = self.tree.children[v].get(next) {
                frame.1 += 1;
                stack.push((child, 0, None));
                continue;
            }

            stack.pop();
            self.place(v);
            if let Some(parent) = stack.last_mut() {
                // the leftmost child starts as its own default ancestor
                let default = parent.2.unwrap_or(v);
                parent.2 = Some(self.apportion(v, default));
            }
        }
    }

    /// Assign the preliminary coordinate of `v` once all its children are placed
    fn place(&mut self, v: usize) {
        let tree = self.tree;
        let from_left = tree
            .left_sibling(v)
            .map(|l| self.data[l].prelim + self.spacing(l, v));

        let children = &tree.children[v];
        match (children.first().copied(), children.last().copied()) {
            (Some(leftmost), Some(rightmost)) => {
                self.execute_shifts(v);
                let midpoint = 0.5
                    * (self.data[leftmost].prelim + self.data[rightmost].prelim
                        + self.extent(rightmost)
                        - self.extent(v));
                match from_left {
                    Some(prelim) => {
                        self.data[v].prelim = prelim;
                        self.data[v].modifier = prelim - midpoint;
                    }
                    None => self.data[v].prelim = midpoint,
                }
            }
            _ => {
                if let Some(prelim) = from_left {
                    self.data[v].prelim = prelim;
                }
            }
        }
    }

    /// Push the subtree of `v` right until it clears the subtrees on its
    /// left, spreading the shift over the siblings in between.
    fn apportion(&mut self, v: usize, default_ancestor: usize) -> usize {
        let Some(w) = self.tree.left_sibling(v) else {
            return default_ancestor;
        };
        let Some(leftmost) = self.tree.leftmost_sibling(v) else {
            return default_ancestor;
        };

        let mut ancestor = default_ancestor;
        let (mut vip, mut vop, mut vim, mut vom) = (v, v, w, leftmost);
        let mut sip = self.data[vip].modifier;
        let mut sop = self.data[vop].modifier;
        let mut sim = self.data[vim].modifier;
        let mut som = self.data[vom].modifier;

        let mut next_right = self.next_right(vim);
        let mut next_left = self.next_left(vip);
        while let (Some(right), Some(left)) = (next_right, next_left) {
            let (Some(outer_left), Some(outer_right)) = (self.next_left(vom), self.next_right(vop))
            else {
                break;
            };
            vim = right;
            vip = left;
            vom = outer_left;
            vop = outer_right;
            self.data[vop].ancestor = v;

            let shift = (self.data[vim].prelim + sim) - (self.data[vip].prelim + sip)
                + self.spacing(vim, v);
            if shift > 0.0 {
                let from = self.ancestor_of(vim, v, ancestor);
                self.move_subtree(from, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.data[vim].modifier;
            sip += self.data[vip].modifier;
            som += self.data[vom].modifier;
            sop += self.data[vop].modifier;

            next_right = self.next_right(vim);
            next_left = self.next_left(vip);
        }

        if let Some(right) = next_right {
            if self.next_right(vop).is_none() {
                self.data[vop].thread = Some(right);
                self.data[vop].modifier += sim - sop;
            }
        }
        if let Some(left) = next_left {
            if self.next_left(vom).is_none() {
                self.data[vom].thread = Some(left);
                self.data[vom].modifier += sip - som;
                ancestor = v;
            }
        }

        ancestor
    }

    fn ancestor_of(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.data[vim].ancestor;
        if self.tree.parents[candidate] == self.tree.parents[v] {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f32) {
        let subtrees = (self.tree.numbers[wp] as f32 - self.tree.numbers[wm] as f32).max(1.0);
        let change = shift / subtrees;
        self.data[wp].change -= change;
        self.data[wp].shift += shift;
        self.data[wm].change += change;
        self.data[wp].prelim += shift;
        self.data[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let tree = self.tree;
        for &w in tree.children[v].iter().rev() {
            let data = &mut self.data[w];
            data.prelim += shift;
            data.modifier += shift;
            change += data.change;
            shift += data.shift + change;
        }
    }

    /// Pre-order pass resolving final coordinates in the top-bottom frame
    pub fn second_walk(&self) -> Vec<Point> {
        let mut positions = vec![Point::origin(); self.tree.len()];
        if self.tree.len() == 0 {
            return positions;
        }

        let min_size = self.tree.min_size();
        let level_extent = if self.config.orientation.is_vertical() {
            min_size.height
        } else {
            min_size.width
        } + self.config.level_separation;

        let mut stack = vec![(0, 0.0)];
        while let Some((v, modsum)) = stack.pop() {
            positions[v] = Point::new(
                self.data[v].prelim + modsum,
                self.tree.depths[v] as f32 * level_extent,
            );
            let modsum = modsum + self.data[v].modifier;
            stack.extend(self.tree.children[v].iter().map(|&c| (c, modsum)));
        }

        positions
    }
}
