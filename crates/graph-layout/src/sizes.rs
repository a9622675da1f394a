use crate::Size;
use std::collections::HashMap;
use std::hash::Hash;

/// Source of node sizes for [`Graph::measure`](crate::Graph::measure).
///
/// A single [`Size`] measures every node the same.
pub trait NodeSizes<N> {
    fn size(&self, node: N) -> Size;
}

impl<N, F> NodeSizes<N> for F
where
    F: Fn(N) -> Size,
{
    fn size(&self, node: N) -> Size {
        self(node)
    }
}

impl<N> NodeSizes<N> for Size {
    fn size(&self, _node: N) -> Size {
        *self
    }
}

/// Nodes missing from the map measure zero
impl<N> NodeSizes<N> for HashMap<N, Size>
where
    N: Eq + Hash,
{
    fn size(&self, node: N) -> Size {
        self.get(&node).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;
    use test_log::test;

    #[test]
    fn measure_from_each_provider() {
        let mut graph = Graph::new();
        graph.add_edge('a', 'b');

        graph.measure(&Size::new(5.0, 6.0));
        assert_eq!(graph.node('b').map(|n| n.size()), Some(Size::new(5.0, 6.0)));

        let measured = HashMap::from([('a', Size::new(10.0, 10.0))]);
        graph.measure(&measured);
        assert_eq!(graph.node('a').map(|n| n.size()), Some(Size::new(10.0, 10.0)));
        assert_eq!(graph.node('b').map(|n| n.size()), Some(Size::zero()));
    }
}
