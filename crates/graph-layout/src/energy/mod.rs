//! Force-directed layout after Fruchterman and Reingold.
//!
//! Nodes start at seeded random positions, repel each other and are pulled
//! together along edges while a cooling temperature bounds how far they can
//! move per iteration. Connected components are then packed side by side.

mod clusters;

use crate::edges::{ArrowEdgeRenderer, ArrowStyle, EdgeRenderer};
use crate::engine::{Layout, LayoutError};
use crate::graph::Graph;
use crate::surface::Surface;
use crate::{Point, Size, Vec2};
use epaint::Stroke;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

const EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FruchtermanReingoldConfig {
    /// Upper bound on simulation steps; cooling may stop earlier
    pub iterations: usize,
    /// Seed of the initial placement
    pub seed: u64,
    /// Gap between packed components
    pub cluster_padding: f32,
    pub arrow: ArrowStyle,
}

impl Default for FruchtermanReingoldConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 401678,
            cluster_padding: 100.0,
            arrow: ArrowStyle::default(),
        }
    }
}

impl FruchtermanReingoldConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug)]
pub struct FruchtermanReingoldLayout {
    config: FruchtermanReingoldConfig,
    edge_renderer: Box<dyn EdgeRenderer>,
}

impl Default for FruchtermanReingoldLayout {
    fn default() -> Self {
        Self::new(FruchtermanReingoldConfig::default())
    }
}

impl FruchtermanReingoldLayout {
    pub fn new(config: FruchtermanReingoldConfig) -> Self {
        Self {
            edge_renderer: Box::new(ArrowEdgeRenderer::new(config.arrow)),
            config,
        }
    }

    pub fn config(&self) -> &FruchtermanReingoldConfig {
        &self.config
    }

    /// Run the force simulation and return the final positions in node order
    fn simulate<N>(&self, graph: &Graph<N>) -> Vec<Point>
    where
        N: Copy + Eq + Hash + fmt::Debug,
    {
        let nodes = graph.nodes();
        let biggest = nodes
            .iter()
            .filter_map(|&n| graph.node(n))
            .map(|n| n.size().max_extent())
            .fold(0.0, f32::max);
        // the simulation area is a square of this side
        let extent = biggest * nodes.len() as f32;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let half = (extent / 2.0) as u32;
        let mut positions: Vec<Point> = nodes
            .iter()
            .map(|_| {
                let x = rng.gen_range(0..=half) as f32;
                let y = rng.gen_range(0..=half) as f32;
                Point::new(x, y)
            })
            .collect();
        if extent <= 0.0 {
            return positions;
        }

        let index: HashMap<N, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.destination)?)))
            .collect();

        let mut temperature = 0.1 * (extent / 2.0 * extent / 2.0).sqrt();
        let k = 0.75 * (extent * extent / nodes.len() as f32).sqrt();
        let attraction_k = 0.75 * k;
        let repulsion_k = 0.75 * k;
        let iterations = self.config.iterations;

        let mut displacements = vec![Vec2::zero(); positions.len()];
        let mut steps = 0;
        for i in 0..iterations {
            steps = i + 1;
            displacements.fill(Vec2::zero());

            for (v, displacement) in displacements.iter_mut().enumerate() {
                for (u, &other) in positions.iter().enumerate() {
                    if u == v {
                        continue;
                    }
                    let delta = positions[v] - other;
                    let length = delta.length().max(EPSILON);
                    *displacement += delta / length * (repulsion_k * repulsion_k / length);
                }
            }

            for &(v, u) in &edges {
                let delta = positions[v] - positions[u];
                let length = delta.length().max(EPSILON);
                let force = delta / length * (length * length / attraction_k);
                displacements[v] -= force;
                displacements[u] += force;
            }

            for (position, displacement) in positions.iter_mut().zip(&displacements) {
                let length = displacement.length().max(EPSILON);
                *position += *displacement / length * length.min(temperature);
            }

            temperature *= 1.0 - i as f32 / iterations as f32;
            trace!("Iteration {i}: temperature {temperature}");
            if temperature < 1.0 / extent {
                break;
            }
        }

        debug!("Force simulation settled after {steps} of {iterations} iterations");
        positions
    }
}

impl<N> Layout<N> for FruchtermanReingoldLayout
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn run(
        &mut self,
        graph: &mut Graph<N>,
        shift_x: f32,
        shift_y: f32,
    ) -> Result<Size, LayoutError<N>> {
        if !graph.has_nodes() {
            return Ok(Size::zero());
        }

        let positions = self.simulate(graph);
        for (node, position) in graph.nodes().to_vec().into_iter().zip(positions) {
            if let Some(n) = graph.node_mut(node) {
                n.set_position(position);
            }
        }

        if let Some(bounds) = graph.bounds() {
            graph.translate(Point::origin() - bounds.origin());
        }
        let mut clusters = clusters::find_clusters(graph);
        clusters::merge_singletons(graph, &mut clusters, self.config.cluster_padding);
        clusters::pack(graph, &mut clusters, self.config.cluster_padding);
        graph.translate(Vec2::new(shift_x, shift_y));

        let size = graph.layout_size();
        debug!(
            "Force layout of {} nodes in {} clusters: {size:?}",
            graph.node_count(),
            clusters.len()
        );
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
