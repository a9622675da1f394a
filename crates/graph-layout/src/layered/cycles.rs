use crate::graph::Graph;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Break every cycle by reversing the edges that point back into the
/// current depth-first path.
///
/// Returns the reversed edges as they were before reversal. If the reversed
/// edge already exists in the other direction the two collapse into one.
pub(super) fn remove_cycles<V>(graph: &mut Graph<V>) -> HashSet<(V, V)>
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let mut reversed = HashSet::new();
    let mut visited = HashSet::new();
    let mut on_path = HashSet::new();

    for start in graph.nodes().to_vec() {
        if !visited.insert(start) {
            continue;
        }
        on_path.insert(start);
        let mut stack = vec![(start, graph.successors_of(start).to_vec(), 0)];

        while let Some((node, targets, next)) = stack.last_mut() {
            let node = *node;
            let Some(&target) = targets.get(*next) else {
                on_path.remove(&node);
                stack.pop();
                continue;
            };
            *next += 1;

            if on_path.contains(&target) {
                graph.remove_edge_between(node, target);
                graph.add_edge(target, node);
                reversed.insert((node, target));
            } else if visited.insert(target) {
                on_path.insert(target);
                let successors = graph.successors_of(target).to_vec();
                stack.push((target, successors, 0));
            }
        }
    }

    debug_assert!(graph.is_acyclic());
    reversed
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn reverses_back_edges() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 3), (3, 1), (3, 4)]);
        let reversed = remove_cycles(&mut graph);

        assert_eq!(reversed, HashSet::from([(3, 1)]));
        assert!(graph.contains_edge(1, 3));
        assert!(!graph.contains_edge(3, 1));
        assert!(graph.is_acyclic());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn two_cycle_collapses() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (2, 1)]);
        let reversed = remove_cycles(&mut graph);

        assert_eq!(reversed, HashSet::from([(2, 1)]));
        assert_eq!(graph.edges().len(), 1);
        assert!(graph.contains_edge(1, 2));
    }

    #[test]
    fn acyclic_graph_is_untouched() {
        let mut graph = Graph::new();
        graph.add_edges([(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert!(remove_cycles(&mut graph).is_empty());
        assert_eq!(graph.edge_count(), 4);
    }
}
