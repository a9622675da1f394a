use super::Orientation;
use crate::graph::Graph;
use crate::{Point, Size};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Map walker coordinates into the configured orientation.
///
/// Levels are pushed apart by the amount their tallest node (widest for
/// horizontal trees) exceeds the smallest node, so that the level separation
/// holds for nodes of any size.
pub(super) fn orient<N>(
    graph: &mut Graph<N>,
    depths: &HashMap<N, usize>,
    orientation: Orientation,
    min_size: Size,
) where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let depth = |node: &N| depths.get(node).copied().unwrap_or(0);

    let mut nodes = graph.nodes().to_vec();
    if orientation.is_reversed() {
        nodes.sort_by_key(|n| Reverse(depth(n)));
    } else {
        nodes.sort_by_key(depth);
    }
    let Some(first) = nodes.first() else {
        return;
    };

    let mut level_max: HashMap<usize, Size> = HashMap::new();
    for node in &nodes {
        let size = graph.node(*node).map(|n| n.size()).unwrap_or_default();
        let max = level_max.entry(depth(node)).or_default();
        *max = Size::new(max.width.max(size.width), max.height.max(size.height));
    }

    let offset = offset(graph, orientation);
    let mut current_level = depth(first);
    let mut local_max = level_max[&current_level];
    let mut global_padding = 0.0f32;
    let mut local_padding = 0.0f32;

    for node in nodes {
        let level = depth(&node);
        if level != current_level {
            if orientation.is_reversed() {
                global_padding -= local_padding;
            } else {
                global_padding += local_padding;
            }
            local_padding = 0.0;
            current_level = level;
            local_max = level_max[&level];
        }

        let Some(geometry) = graph.node_mut(node) else {
            continue;
        };
        let size = geometry.size();
        let mut position = geometry.position();
        match orientation {
            Orientation::TopBottom => {
                local_padding = local_padding.max(size.height - min_size.height);
            }
            Orientation::BottomTop => {
                let diff = local_max.height - size.height;
                position.y -= diff;
                local_padding = local_padding.max(diff);
            }
            Orientation::LeftRight => {
                local_padding = local_padding.max(size.width - min_size.width);
            }
            Orientation::RightLeft => {
                let diff = local_max.width - size.width;
                position.y -= diff;
                local_padding = local_padding.max(diff);
            }
        }

        geometry.set_position(match orientation {
            Orientation::TopBottom => {
                Point::new(position.x - offset.x, position.y + global_padding)
            }
            Orientation::BottomTop => {
                Point::new(position.x - offset.x, offset.y - position.y - global_padding)
            }
            Orientation::LeftRight => {
                Point::new(position.y + global_padding, position.x - offset.x)
            }
            Orientation::RightLeft => {
                Point::new(offset.y - position.y - global_padding, position.x - offset.x)
            }
        });
    }
}

/// Reference corner of the unoriented layout: top-left for top-down trees,
/// bottom-left for reversed ones
fn offset<N>(graph: &Graph<N>, orientation: Orientation) -> Point
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let positions = graph.nodes().iter().filter_map(|n| graph.position(*n));
    let (min_x, min_y, max_y) = positions.fold(
        (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY),
        |(min_x, min_y, max_y), p| (min_x.min(p.x), min_y.min(p.y), max_y.max(p.y)),
    );

    if orientation.is_reversed() {
        Point::new(min_x, max_y)
    } else {
        Point::new(min_x, min_y)
    }
}
