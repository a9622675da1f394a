use super::{EdgeBounds, EdgeRenderer};
use crate::geometry::{centroid, clip_line, Line, Point, Vec2};
use crate::surface::Surface;
use epaint::Stroke;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Shape of the arrowhead drawn at the destination end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    /// Length of the two arrowhead sides
    pub length: f32,
    /// Angle in radians between the shaft and each arrowhead side
    pub half_angle: f32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            length: 50.0,
            half_angle: 0.5,
        }
    }
}

/// Triangle with its tip at `line.end`, opening back along the line
pub fn arrow_head(line: &Line, style: &ArrowStyle) -> [Point; 3] {
    let angle = line.angle() + PI;
    let side = |a: f32| line.end + Vec2::new(a.cos(), a.sin()) * style.length;
    [
        line.end,
        side(angle - style.half_angle),
        side(angle + style.half_angle),
    ]
}

/// Straight edges clipped at the destination's border and ending in a
/// filled arrowhead
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowEdgeRenderer {
    pub arrow: ArrowStyle,
}

impl ArrowEdgeRenderer {
    pub fn new(arrow: ArrowStyle) -> Self {
        Self { arrow }
    }

    /// Fill the arrowhead for `line` and return where the shaft must stop so
    /// that it does not overdraw the head
    pub(crate) fn draw_head(
        &self,
        surface: &mut dyn Surface,
        line: &Line,
        stroke: Stroke,
    ) -> Point {
        let head = arrow_head(line, &self.arrow);
        surface.fill_triangle(head, stroke);
        centroid(&head)
    }
}

impl EdgeRenderer for ArrowEdgeRenderer {
    fn render(&self, surface: &mut dyn Surface, edges: &[EdgeBounds], stroke: Stroke) {
        for edge in edges {
            let clipped = clip_line(edge.source.center(), &edge.destination);
            let stop = self.draw_head(surface, &clipped, stroke);
            surface.draw_line(Line::new(clipped.start, stop), stroke);
        }
    }
}
