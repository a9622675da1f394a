//! Sugiyama-style layered layout for arbitrary directed graphs.
//!
//! The pipeline runs on a private working copy of the graph:
//! 1. cycle removal by reversing back edges
//! 2. layering by repeatedly stripping sources
//! 3. long edges split through dummy vertices
//! 4. crossing minimization (median sweeps and transposition)
//! 5. Brandes–Köpf horizontal placement, layer by layer vertical placement
//! 6. dummy chains collapsed into bend points, reversed edges restored
//!
//! Only the positions of the caller's nodes are written back. Edge routes are
//! kept by the layout and drawn by [`Layout::draw_edges`].

mod crossings;
mod cycles;
mod layers;
mod positions;
mod routes;

pub use routes::RoutedEdge;

use crate::edges::{ArrowEdgeRenderer, ArrowStyle, EdgeRenderer};
use crate::engine::{Layout, LayoutError};
use crate::graph::Graph;
use crate::surface::Surface;
use crate::{Point, Size};
use epaint::Stroke;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};

/// Vertex of the working graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Vertex<N> {
    Node(N),
    /// Placeholder splitting an edge that spans several layers
    Dummy(usize),
}

impl<N> Vertex<N> {
    fn is_dummy(&self) -> bool {
        matches!(self, Self::Dummy(_))
    }
}

/// Configuration for the layered layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SugiyamaConfig {
    /// Gap between consecutive layers
    pub level_separation: f32,

    /// Minimum gap between nodes of the same layer
    pub node_separation: f32,

    /// Rounds of crossing minimization
    pub crossing_iterations: usize,

    pub arrow: ArrowStyle,
}

impl Default for SugiyamaConfig {
    fn default() -> Self {
        Self {
            level_separation: 100.0,
            node_separation: 100.0,
            crossing_iterations: 24,
            arrow: ArrowStyle::default(),
        }
    }
}

impl SugiyamaConfig {
    pub fn with_crossing_iterations(mut self, iterations: usize) -> Self {
        self.crossing_iterations = iterations;
        self
    }
}

/// Figures of the last run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayeredStats {
    pub layers: usize,
    pub dummies: usize,
    /// Crossings right after layering
    pub initial_crossings: usize,
    /// Crossings of the kept ordering
    pub crossings: usize,
}

#[derive(Debug)]
pub struct SugiyamaLayout<N> {
    config: SugiyamaConfig,
    arrow: ArrowEdgeRenderer,
    routes: Vec<RoutedEdge<N>>,
    stats: LayeredStats,
}

impl<N> Default for SugiyamaLayout<N> {
    fn default() -> Self {
        Self::new(SugiyamaConfig::default())
    }
}

impl<N> SugiyamaLayout<N> {
    pub fn new(config: SugiyamaConfig) -> Self {
        Self {
            arrow: ArrowEdgeRenderer::new(config.arrow),
            config,
            routes: Vec::new(),
            stats: LayeredStats::default(),
        }
    }

    pub fn config(&self) -> &SugiyamaConfig {
        &self.config
    }

    pub fn stats(&self) -> LayeredStats {
        self.stats
    }

    /// Edge routes of the last run, in the caller's edge order
    pub fn routed_edges(&self) -> &[RoutedEdge<N>] {
        &self.routes
    }
}

impl<N> SugiyamaLayout<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    /// Copy the caller's graph, leaving out self-loops
    fn working_copy(graph: &Graph<N>) -> Graph<Vertex<N>> {
        let mut working = Graph::new();
        for &node in graph.nodes() {
            working.add_node(Vertex::Node(node));
            if let (Some(size), Some(copy)) = (
                graph.node(node).map(|n| n.size()),
                working.node_mut(Vertex::Node(node)),
            ) {
                copy.set_size(size);
            }
        }
        for edge in graph.edges() {
            if edge.source == edge.destination {
                warn!("Ignoring self-loop on {:?}", edge.source);
                continue;
            }
            working.add_edge(Vertex::Node(edge.source), Vertex::Node(edge.destination));
        }
        working
    }
}

impl<N> Layout<N> for SugiyamaLayout<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn run(
        &mut self,
        graph: &mut Graph<N>,
        shift_x: f32,
        shift_y: f32,
    ) -> Result<Size, LayoutError<N>> {
        self.routes.clear();
        self.stats = LayeredStats::default();
        if !graph.has_nodes() {
            return Ok(Size::zero());
        }

        let mut working = Self::working_copy(graph);
        let reversed = cycles::remove_cycles(&mut working);

        let mut layers = layers::assign_layers(&working);
        let dummies = layers::insert_dummies(&mut working, &mut layers);

        let initial_crossings = crossings::count_crossings(&working, &layers);
        let (layers, crossings) =
            crossings::minimize_crossings(&working, layers, self.config.crossing_iterations);

        let is_dummy = |v: Vertex<N>| v.is_dummy();
        let centers =
            positions::assign_x(&working, &layers, &is_dummy, self.config.node_separation);
        let tops = positions::assign_y(&working, &layers, &is_dummy, self.config.level_separation);

        let width = |v: Vertex<N>| working.node(v).map_or(0.0, |n| n.width());
        let left = |v: Vertex<N>| centers.get(&v).copied().unwrap_or(0.0) - 0.5 * width(v);
        let min_left = working
            .nodes()
            .iter()
            .filter(|v| !v.is_dummy())
            .map(|&v| left(v))
            .fold(f32::INFINITY, f32::min);

        let placed: Vec<(Vertex<N>, Point)> = layers
            .iter()
            .zip(&tops)
            .flat_map(|(layer, &top)| {
                layer.iter().map(move |&v| {
                    (v, Point::new(left(v) - min_left + shift_x, top + shift_y))
                })
            })
            .collect();
        for (vertex, position) in placed {
            if let Some(node) = working.node_mut(vertex) {
                node.set_position(position);
            }
            if let Vertex::Node(key) = vertex {
                if let Some(node) = graph.node_mut(key) {
                    node.set_position(position);
                }
            }
        }

        self.routes = routes::route_edges(&working, graph.edges(), &reversed);
        self.stats = LayeredStats {
            layers: layers.len(),
            dummies,
            initial_crossings,
            crossings,
        };

        let size = graph.layout_size();
        debug!(
            "Layered layout: {} layers, {} dummies, {} reversed, crossings {} -> {}, {size:?}",
            layers.len(),
            dummies,
            reversed.len(),
            initial_crossings,
            crossings
        );
        Ok(size)
    }

    fn draw_edges(&self, surface: &mut dyn Surface, graph: &Graph<N>, stroke: Stroke) {
        routes::draw_routes(surface, graph, &self.routes, &self.arrow, stroke);
    }

    fn set_edge_renderer(
        &mut self,
        _renderer: Box<dyn EdgeRenderer>,
    ) -> Result<(), LayoutError<N>> {
        Err(LayoutError::UnsupportedEdgeRenderer)
    }
}
