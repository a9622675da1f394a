//! Edge renderers turning laid out geometry into lines and arrowheads.

mod arrow;
mod straight;

pub use arrow::{arrow_head, ArrowEdgeRenderer, ArrowStyle};
pub use straight::StraightEdgeRenderer;

use crate::surface::Surface;
use crate::Rect;
use epaint::Stroke;
use std::fmt;

/// Boxes of the two endpoints of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeBounds {
    pub source: Rect,
    pub destination: Rect,
}

/// Draws every edge of a laid out graph
pub trait EdgeRenderer: fmt::Debug {
    fn render(&self, surface: &mut dyn Surface, edges: &[EdgeBounds], stroke: Stroke);
}
