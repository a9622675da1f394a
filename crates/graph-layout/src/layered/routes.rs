use super::Vertex;
use crate::edges::ArrowEdgeRenderer;
use crate::geometry::{clip_line, Line};
use crate::graph::{Edge, Graph};
use crate::surface::Surface;
use crate::Point;
use epaint::Stroke;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Drawn path of one edge of the caller's graph
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge<N> {
    pub source: N,
    pub destination: N,
    /// Polyline from the source's center to the destination's center,
    /// through one bend point per crossed layer
    pub points: Vec<Point>,
    /// The edge was turned around to break a cycle
    pub reversed: bool,
}

/// Collapse every dummy chain of the laid out working graph into a polyline
/// keyed by its real endpoints
fn denormalize<N>(working: &Graph<Vertex<N>>) -> HashMap<(N, N), Vec<Point>>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let center = |v: Vertex<N>| working.node(v).map_or(Point::origin(), |n| n.center());
    let mut chains = HashMap::new();

    for edge in working.edges() {
        let Vertex::Node(source) = edge.source else {
            continue;
        };
        let mut points = vec![center(edge.source)];
        let mut current = edge.destination;
        while let Vertex::Dummy(_) = current {
            points.push(center(current));
            match working.successors_of(current).first() {
                Some(&next) => current = next,
                None => break,
            }
        }
        if let Vertex::Node(destination) = current {
            points.push(center(current));
            chains.insert((source, destination), points);
        }
    }

    chains
}

/// Route every edge of the caller's graph through the working graph,
/// restoring the direction of reversed edges
pub(super) fn route_edges<N>(
    working: &Graph<Vertex<N>>,
    edges: &[Edge<N>],
    reversed: &HashSet<(Vertex<N>, Vertex<N>)>,
) -> Vec<RoutedEdge<N>>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let chains = denormalize(working);

    edges
        .iter()
        .filter_map(|edge| {
            let (s, d) = (edge.source, edge.destination);
            let is_reversed = reversed.contains(&(Vertex::Node(s), Vertex::Node(d)));
            let points = if is_reversed {
                let mut points = chains.get(&(d, s))?.clone();
                points.reverse();
                points
            } else {
                chains.get(&(s, d))?.clone()
            };
            Some(RoutedEdge {
                source: s,
                destination: d,
                points,
                reversed: is_reversed,
            })
        })
        .collect()
}

/// Draw routed edges with an arrowhead clipped against the destination box
pub(super) fn draw_routes<N>(
    surface: &mut dyn Surface,
    graph: &Graph<N>,
    routes: &[RoutedEdge<N>],
    arrow: &ArrowEdgeRenderer,
    stroke: Stroke,
) where
    N: Copy + Eq + Hash + fmt::Debug,
{
    for route in routes {
        let Some(destination) = graph.node(route.destination) else {
            continue;
        };
        let [.., before_last, _] = route.points.as_slice() else {
            continue;
        };

        let clipped = clip_line(*before_last, &destination.bounds());
        let stop = arrow.draw_head(surface, &clipped, stroke);

        if let [start, bends @ .., _] = route.points.as_slice() {
            if bends.is_empty() {
                surface.draw_line(Line::new(*start, stop), stroke);
            } else {
                let mut points = Vec::with_capacity(bends.len() + 2);
                points.push(*start);
                points.extend_from_slice(bends);
                points.push(stop);
                surface.draw_path(&points, stroke);
            }
        }
    }
}
