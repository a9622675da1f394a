use super::Orientation;
use crate::edges::{EdgeBounds, EdgeRenderer};
use crate::surface::Surface;
use crate::Point;
use epaint::Stroke;

/// Orthogonal parent to child connectors.
///
/// Each edge leaves the child towards its parent, bends halfway through the
/// level separation, runs along the level to the parent's center line and
/// enters the parent's facing side.
#[derive(Debug, Clone, Copy)]
pub struct TreeEdgeRenderer {
    orientation: Orientation,
    level_separation: f32,
}

impl TreeEdgeRenderer {
    pub fn new(orientation: Orientation, level_separation: f32) -> Self {
        Self {
            orientation,
            level_separation,
        }
    }

    /// Corners of the elbow from the child to the parent's facing side
    fn connector(&self, edge: &EdgeBounds) -> [Point; 4] {
        let parent = &edge.source;
        let child = &edge.destination;
        let half = self.level_separation / 2.0;

        match self.orientation {
            Orientation::TopBottom => {
                let bend = child.y - half;
                [
                    Point::new(child.center().x, child.y),
                    Point::new(child.center().x, bend),
                    Point::new(parent.center().x, bend),
                    Point::new(parent.center().x, parent.bottom()),
                ]
            }
            Orientation::BottomTop => {
                let bend = child.bottom() + half;
                [
                    Point::new(child.center().x, child.bottom()),
                    Point::new(child.center().x, bend),
                    Point::new(parent.center().x, bend),
                    Point::new(parent.center().x, parent.y),
                ]
            }
            Orientation::LeftRight => {
                let bend = child.x - half;
                [
                    Point::new(child.x, child.center().y),
                    Point::new(bend, child.center().y),
                    Point::new(bend, parent.center().y),
                    Point::new(parent.right(), parent.center().y),
                ]
            }
            Orientation::RightLeft => {
                let bend = child.right() + half;
                [
                    Point::new(child.right(), child.center().y),
                    Point::new(bend, child.center().y),
                    Point::new(bend, parent.center().y),
                    Point::new(parent.x, parent.center().y),
                ]
            }
        }
    }
}

impl EdgeRenderer for TreeEdgeRenderer {
    fn render(&self, surface: &mut dyn Surface, edges: &[EdgeBounds], stroke: Stroke) {
        for edge in edges {
            surface.draw_path(&self.connector(edge), stroke);
        }
    }
}
