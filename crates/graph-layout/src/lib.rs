//! Layout algorithms for directed graphs
//!
//! Nodes live in a [`Graph`] keyed by any small copyable id. The host sets
//! every node's size, runs a [`Layout`], reads the positions back and asks the
//! layout to draw the edges on a [`Surface`].
//!
//! # Layout Engines
//!
//! - [`BuchheimWalkerLayout`]: tidy trees in linear time, four orientations
//! - [`SugiyamaLayout`]: layered drawing of arbitrary directed graphs
//! - [`FruchtermanReingoldLayout`]: seeded force-directed placement
//!
//! # Example
//!
//! ```
//! use graphview_layout::{edge_stroke, BuchheimWalkerLayout, Graph, Layout, Shape, Size};
//!
//! // Create a graph
//! let mut graph = Graph::new();
//! graph.add_edge(1, 2);
//! graph.add_edge(1, 3);
//!
//! // Provide node sizes
//! graph.measure(&|_node: u32| Size::new(50.0, 20.0));
//!
//! // Run the layout, the top-left corner lands on (10, 10)
//! let mut layout = BuchheimWalkerLayout::default();
//! let size = layout.run(&mut graph, 10.0, 10.0).unwrap();
//! assert_eq!(graph.bounds().map(|b| b.size()), Some(size));
//!
//! // Record the edge drawing
//! let mut surface: Vec<Shape> = Vec::new();
//! layout.draw_edges(&mut surface, &graph, edge_stroke());
//! assert_eq!(surface.len(), 2);
//! ```

mod engine;
mod geometry;
mod sizes;

pub mod edges;
pub mod energy;
pub mod graph;
pub mod layered;
pub mod surface;
pub mod tree;

// Re-export core types and traits
pub use engine::{Layout, LayoutError};
pub use geometry::{centroid, clip_line, Line, Point, Rect, Size, Vec2};
pub use graph::{Edge, Graph, GraphError, GraphEvent, Node};
pub use sizes::NodeSizes;
pub use epaint::{Color32, Shape, Stroke};
pub use surface::{edge_stroke, Surface};

// Re-export layout engines
pub use edges::{ArrowEdgeRenderer, ArrowStyle, EdgeBounds, EdgeRenderer, StraightEdgeRenderer};
pub use energy::{FruchtermanReingoldConfig, FruchtermanReingoldLayout};
pub use layered::{LayeredStats, RoutedEdge, SugiyamaConfig, SugiyamaLayout};
pub use tree::{BuchheimWalkerConfig, BuchheimWalkerLayout, Orientation, TreeEdgeRenderer};
