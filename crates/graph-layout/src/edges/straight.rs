use super::{EdgeBounds, EdgeRenderer};
use crate::geometry::Line;
use crate::surface::Surface;
use epaint::Stroke;

/// Connects the centers of both endpoints with a plain line
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightEdgeRenderer;

impl EdgeRenderer for StraightEdgeRenderer {
    fn render(&self, surface: &mut dyn Surface, edges: &[EdgeBounds], stroke: Stroke) {
        for edge in edges {
            surface.draw_line(
                Line::new(edge.source.center(), edge.destination.center()),
                stroke,
            );
        }
    }
}
