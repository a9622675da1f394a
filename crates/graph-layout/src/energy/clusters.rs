use crate::graph::Graph;
use crate::{Point, Rect, Vec2};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// A connected component and the box around its nodes
#[derive(Debug, Clone)]
pub(super) struct Cluster<N> {
    pub nodes: Vec<N>,
    pub rect: Rect,
}

impl<N> Cluster<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn new(graph: &Graph<N>, node: N) -> Self {
        Self {
            nodes: vec![node],
            rect: graph.node(node).map(|n| n.bounds()).unwrap_or_default(),
        }
    }

    fn add(&mut self, graph: &Graph<N>, node: N) {
        self.nodes.push(node);
        if let Some(n) = graph.node(node) {
            self.rect = self.rect.union(&n.bounds());
        }
    }

    fn offset(&mut self, graph: &mut Graph<N>, offset: Vec2) {
        for &node in &self.nodes {
            if let Some(n) = graph.node_mut(node) {
                n.translate(offset);
            }
        }
        self.rect.translate(offset);
    }
}

/// Group nodes into weakly connected components, in node insertion order
pub(super) fn find_clusters<N>(graph: &Graph<N>) -> Vec<Cluster<N>>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let neighbours = |n: N| -> Vec<N> {
        graph
            .successors_of(n)
            .iter()
            .chain(graph.predecessors_of(n))
            .copied()
            .collect()
    };

    let mut visited = HashSet::new();
    let mut clusters = Vec::new();
    for &start in graph.nodes() {
        if !visited.insert(start) {
            continue;
        }
        let mut cluster = Cluster::new(graph, start);
        let mut stack = vec![(neighbours(start), 0)];
        while let Some((candidates, next)) = stack.last_mut() {
            let Some(&node) = candidates.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;
            if visited.insert(node) {
                cluster.add(graph, node);
                stack.push((neighbours(node), 0));
            }
        }
        clusters.push(cluster);
    }

    clusters
}

/// Fold every single node cluster into the first one, lining the nodes up
/// to the right of it
pub(super) fn merge_singletons<N>(
    graph: &mut Graph<N>,
    clusters: &mut Vec<Cluster<N>>,
    padding: f32,
) where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let Some(first) = clusters.iter().position(|c| c.nodes.len() == 1) else {
        return;
    };

    let mut index = first + 1;
    while index < clusters.len() {
        if clusters[index].nodes.len() != 1 {
            index += 1;
            continue;
        }
        let single = clusters.remove(index);
        let target = &mut clusters[first];
        for node in single.nodes {
            let position = Point::new(target.rect.right() + padding, target.rect.y);
            if let Some(n) = graph.node_mut(node) {
                n.set_position(position);
            }
            target.add(graph, node);
        }
    }
}

/// Lay clusters out left to right, top aligned, `padding` apart, the first
/// one at the origin
pub(super) fn pack<N>(graph: &mut Graph<N>, clusters: &mut [Cluster<N>], padding: f32)
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    let mut previous: Option<Rect> = None;
    for cluster in clusters {
        let target = match previous {
            None => Point::origin(),
            Some(prev) => Point::new(prev.right() + padding, prev.y),
        };
        cluster.offset(graph, target - cluster.rect.origin());
        previous = Some(cluster.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use test_log::test;

    fn graph() -> Graph<u32> {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (3, 2), (4, 5)]);
        graph.add_nodes([6, 7]);
        graph.measure(&|_: u32| Size::new(10.0, 10.0));
        graph
    }

    #[test]
    fn components_follow_both_directions() {
        let clusters = find_clusters(&graph());
        let nodes: Vec<Vec<u32>> = clusters.into_iter().map(|c| c.nodes).collect();
        assert_eq!(nodes, vec![vec![1, 2, 3], vec![4, 5], vec![6], vec![7]]);
    }

    #[test]
    fn singletons_line_up_in_one_cluster() {
        let mut graph = graph();
        let mut clusters = find_clusters(&graph);
        merge_singletons(&mut graph, &mut clusters, 100.0);

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[2].nodes, vec![6, 7]);
        assert_eq!(graph.position(7), Some(Point::new(110.0, 0.0)));
        assert_eq!(clusters[2].rect, Rect::new(0.0, 0.0, 120.0, 10.0));
    }

    #[test]
    fn packed_clusters_do_not_touch() {
        let mut graph = graph();
        let mut clusters = find_clusters(&graph);
        merge_singletons(&mut graph, &mut clusters, 100.0);
        pack(&mut graph, &mut clusters, 100.0);

        assert_eq!(clusters[0].rect.origin(), Point::origin());
        for pair in clusters.windows(2) {
            assert_eq!(pair[1].rect.x, pair[0].rect.right() + 100.0);
            assert_eq!(pair[1].rect.y, pair[0].rect.y);
        }
    }
}
