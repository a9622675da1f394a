use crate::edges::EdgeRenderer;
use crate::graph::{Graph, GraphError};
use crate::surface::Surface;
use crate::Size;
use epaint::Stroke;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while running a layout
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError<N>
where
    N: fmt::Debug,
{
    #[error(transparent)]
    Graph(#[from] GraphError<N>),

    /// The layout draws its edges from internal routing data
    #[error("this layout does not support custom edge renderers")]
    UnsupportedEdgeRenderer,
}

/// A layout algorithm placing the nodes of a [`Graph`]
///
/// The host assigns every node's size, calls [`Layout::run`], then reads back
/// node positions and calls [`Layout::draw_edges`] on every paint.
pub trait Layout<N>
where
    N: fmt::Debug,
{
    /// Position every node of the graph
    ///
    /// The top-left corner of the layout is moved to `(shift_x, shift_y)`.
    /// Returns the size of the bounding box of all nodes.
    ///
    /// # Errors
    /// Returns an error if the graph does not provide what the algorithm
    /// needs, such as a root node for tree layouts
    fn run(&mut self, graph: &mut Graph<N>, shift_x: f32, shift_y: f32)
        -> Result<Size, LayoutError<N>>;

    /// Draw the edges of a graph previously laid out by this engine
    fn draw_edges(&self, surface: &mut dyn Surface, graph: &Graph<N>, stroke: Stroke);

    /// Replace the renderer used by [`Layout::draw_edges`]
    ///
    /// # Errors
    /// Returns [`LayoutError::UnsupportedEdgeRenderer`] for layouts whose edge
    /// geometry depends on their own routing
    fn set_edge_renderer(&mut self, renderer: Box<dyn EdgeRenderer>)
        -> Result<(), LayoutError<N>>;
}
