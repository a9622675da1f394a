//! Drawing surface consumed by edge renderers.
//!
//! The host implements [`Surface`] on top of its canvas. A `Vec<Shape>` is
//! also a surface and collects the epaint shapes that were drawn, ready to be
//! handed to a painter.

use crate::geometry::{Line, Point};
use epaint::{Color32, Pos2, Shape, Stroke};

/// Stroke the engines draw edges with unless the host asks otherwise
pub fn edge_stroke() -> Stroke {
    Stroke::new(5.0, Color32::BLACK)
}

impl From<Point> for Pos2 {
    fn from(point: Point) -> Self {
        epaint::pos2(point.x, point.y)
    }
}

/// Canvas abstraction the edge renderers draw on
pub trait Surface {
    fn draw_line(&mut self, line: Line, stroke: Stroke);

    /// Open polyline through `points`
    fn draw_path(&mut self, points: &[Point], stroke: Stroke);

    /// Arrowheads are filled with the stroke color.
    fn fill_triangle(&mut self, points: [Point; 3], stroke: Stroke);
}

impl Surface for Vec<Shape> {
    fn draw_line(&mut self, line: Line, stroke: Stroke) {
        self.push(Shape::line_segment([line.start.into(), line.end.into()], stroke));
    }

    fn draw_path(&mut self, points: &[Point], stroke: Stroke) {
        let points = points.iter().map(|&p| Pos2::from(p)).collect();
        self.push(Shape::line(points, stroke));
    }

    fn fill_triangle(&mut self, points: [Point; 3], stroke: Stroke) {
        let points = points.iter().map(|&p| Pos2::from(p)).collect();
        self.push(Shape::convex_polygon(points, stroke.color, Stroke::NONE));
    }
}
