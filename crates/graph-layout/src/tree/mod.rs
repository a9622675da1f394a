//! Tidy tree layout using the Buchheim–Walker algorithm.
//!
//! Runs in linear time on the tree reachable from the first node of the
//! graph. Siblings keep their insertion order, parents are centered over
//! their children and subtrees are packed as tightly as the separations
//! allow.

mod edges;
mod position;
mod walk;

pub use edges::TreeEdgeRenderer;

use crate::edges::EdgeRenderer;
use crate::engine::{Layout, LayoutError};
use crate::graph::Graph;
use crate::surface::Surface;
use crate::{Point, Size, Vec2};
use epaint::Stroke;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};
use walk::{TreeView, Walker};

/// Direction in which the tree grows from its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl Orientation {
    /// Levels are stacked vertically
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopBottom | Self::BottomTop)
    }

    /// The root ends up on the bottom or right side
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuchheimWalkerConfig {
    /// Gap between siblings
    pub sibling_separation: f32,
    /// Gap between adjacent nodes of different parents
    pub subtree_separation: f32,
    /// Gap between levels
    pub level_separation: f32,
    pub orientation: Orientation,
}

impl Default for BuchheimWalkerConfig {
    fn default() -> Self {
        Self {
            sibling_separation: 100.0,
            subtree_separation: 100.0,
            level_separation: 100.0,
            orientation: Orientation::TopBottom,
        }
    }
}

impl BuchheimWalkerConfig {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_level_separation(mut self, separation: f32) -> Self {
        self.level_separation = separation;
        self
    }
}

#[derive(Debug)]
pub struct BuchheimWalkerLayout<N> {
    config: BuchheimWalkerConfig,
    edge_renderer: Box<dyn EdgeRenderer>,
    depths: HashMap<N, usize>,
}

impl<N> Default for BuchheimWalkerLayout<N> {
    fn default() -> Self {
        Self::new(BuchheimWalkerConfig::default())
    }
}

impl<N> BuchheimWalkerLayout<N> {
    pub fn new(config: BuchheimWalkerConfig) -> Self {
        let edge_renderer = Box::new(TreeEdgeRenderer::new(
            config.orientation,
            config.level_separation,
        ));
        Self {
            config,
            edge_renderer,
            depths: HashMap::new(),
        }
    }

    pub fn config(&self) -> &BuchheimWalkerConfig {
        &self.config
    }
}

impl<N> BuchheimWalkerLayout<N>
where
    N: Copy + Eq + Hash,
{
    /// Level of a node in the last run, the root being at depth 0
    pub fn depth_of(&self, node: N) -> Option<usize> {
        self.depths.get(&node).copied()
    }
}

impl<N> Layout<N> for BuchheimWalkerLayout<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn run(
        &mut self,
        graph: &mut Graph<N>,
        shift_x: f32,
        shift_y: f32,
    ) -> Result<Size, LayoutError<N>> {
        let root = graph.node_at(0)?;
        let tree = TreeView::build(graph, root);
        if tree.len() < graph.node_count() {
            warn!(
                "{} nodes are not reachable from the root {root:?} and are placed at depth 0",
                graph.node_count() - tree.len()
            );
        }

        let mut walker = Walker::new(&tree, &self.config);
        walker.first_walk();
        let positions = walker.second_walk();

        let mut depths: HashMap<N, usize> = graph.nodes().iter().map(|&n| (n, 0)).collect();
        for node in graph.nodes().to_vec() {
            if let Some(geometry) = graph.node_mut(node) {
                geometry.set_position(Point::origin());
            }
        }
        for (index, &key) in tree.keys.iter().enumerate() {
            depths.insert(key, tree.depths[index]);
            if let Some(geometry) = graph.node_mut(key) {
                geometry.set_position(positions[index]);
            }
        }

        position::orient(graph, &depths, self.config.orientation, tree.min_size());
        graph.translate(Vec2::new(shift_x, shift_y));

        let size = graph.layout_size();
        debug!(
            "Tree layout of {} nodes ({} levels): {size:?}",
            graph.node_count(),
            tree.depths.iter().max().map_or(0, |d| d + 1)
        );
        self.depths = depths;
        Ok(size)
    }

    fn draw_edges(&self, surface: &mut dyn Surface, graph: &Graph<N>, stroke: Stroke) {
        self.edge_renderer.render(surface, &graph.edge_bounds(), stroke);
    }

    fn set_edge_renderer(
        &mut self,
        renderer: Box<dyn EdgeRenderer>,
    ) -> Result<(), LayoutError<N>> {
        self.edge_renderer = renderer;
        Ok(())
    }
}
