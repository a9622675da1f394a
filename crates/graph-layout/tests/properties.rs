use graphview_layout::{
    clip_line, BuchheimWalkerConfig, BuchheimWalkerLayout, FruchtermanReingoldConfig,
    FruchtermanReingoldLayout, Graph, Layout, Point, Rect, RoutedEdge, Size, SugiyamaLayout,
};
use proptest::prelude::*;

const TOLERANCE: f32 = 1e-2;
const SIBLING_GAP: f32 = 40.0;

fn on_border(point: Point, rect: &Rect) -> bool {
    let within = point.x >= rect.x - TOLERANCE
        && point.x <= rect.right() + TOLERANCE
        && point.y >= rect.y - TOLERANCE
        && point.y <= rect.bottom() + TOLERANCE;
    let touches = (point.x - rect.x).abs() < TOLERANCE
        || (point.x - rect.right()).abs() < TOLERANCE
        || (point.y - rect.y).abs() < TOLERANCE
        || (point.y - rect.bottom()).abs() < TOLERANCE;
    within && touches
}

fn graph_strategy() -> impl Strategy<Value = (u8, Vec<(u8, u8)>)> {
    (1u8..8).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..12)))
}

fn build(nodes: u8, edges: &[(u8, u8)]) -> Graph<u8> {
    let mut graph = Graph::new();
    graph.add_nodes(0..nodes);
    graph.add_edges(edges.iter().copied());
    graph.measure(&|n: u8| Size::new(20.0 + f32::from(n) * 5.0, 30.0));
    graph
}

/// Points strictly between the two endpoints of a route
fn bends<N>(route: &RoutedEdge<N>) -> &[Point] {
    match route.points.as_slice() {
        [_, bends @ .., _] => bends,
        _ => &[],
    }
}

fn check_layout(
    layout: &mut dyn Layout<u8>,
    graph: &mut Graph<u8>,
    shift: (f32, f32),
) -> Result<(), TestCaseError> {
    let size = layout
        .run(graph, shift.0, shift.1)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let bounds = graph.bounds().ok_or_else(|| TestCaseError::fail("no bounds"))?;

    prop_assert_eq!(bounds.size(), size);
    prop_assert!((bounds.x - shift.0).abs() < TOLERANCE);
    prop_assert!((bounds.y - shift.1).abs() < TOLERANCE);
    for &node in graph.nodes() {
        let p = graph.position(node).ok_or_else(|| TestCaseError::fail("missing node"))?;
        prop_assert!(p.x.is_finite() && p.y.is_finite());
    }
    Ok(())
}

proptest! {
    #[test]
    fn clipped_end_lies_on_the_destination_border(
        sx in -500.0..500.0f32,
        sy in -500.0..500.0f32,
        x in -200.0..200.0f32,
        y in -200.0..200.0f32,
        w in 1.0..150.0f32,
        h in 1.0..150.0f32,
    ) {
        let rect = Rect::new(x, y, w, h);
        let start = Point::new(sx, sy);
        prop_assume!(!rect.contains(start));

        let line = clip_line(start, &rect);
        prop_assert_eq!(line.start, start);
        prop_assert!(on_border(line.end, &rect), "{:?} not on {:?}", line.end, rect);
    }
}

proptest! {
    #[test]
    fn edges_only_touch_members((n, edges) in graph_strategy(), removed in 0u8..8) {
        let mut graph = build(n, &edges);
        let _ = graph.remove_node(removed);

        prop_assert!(!graph.contains_node(removed));
        for edge in graph.edges() {
            prop_assert!(graph.contains_node(edge.source));
            prop_assert!(graph.contains_node(edge.destination));
            prop_assert!(edge.source != removed && edge.destination != removed);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tree_layout_fits_its_size(
        (n, edges) in graph_strategy(),
        sx in 0.0..100.0f32,
        sy in 0.0..100.0f32,
    ) {
        let mut graph = build(n, &edges);
        check_layout(&mut BuchheimWalkerLayout::<u8>::default(), &mut graph, (sx, sy))?;
    }

    #[test]
    fn layered_layout_fits_its_size(
        (n, edges) in graph_strategy(),
        sx in 0.0..100.0f32,
        sy in 0.0..100.0f32,
    ) {
        let mut graph = build(n, &edges);
        let mut layout = SugiyamaLayout::<u8>::default();
        check_layout(&mut layout, &mut graph, (sx, sy))?;

        let stats = layout.stats();
        prop_assert!(stats.crossings <= stats.initial_crossings);
        prop_assert_eq!(graph.node_count(), usize::from(n));

        for route in layout.routed_edges() {
            prop_assert!(route.points.len() >= 2);
            let (source, destination) = (route.source, route.destination);
            let (Some(s), Some(d)) = (graph.position(source), graph.position(destination)) else {
                return Err(TestCaseError::fail("routed edge between unknown nodes"));
            };
            if route.reversed {
                prop_assert!(s.y > d.y);
            } else {
                prop_assert!(d.y > s.y);
            }
        }
    }

    #[test]
    fn force_layout_fits_its_size(
        (n, edges) in graph_strategy(),
        sx in 0.0..100.0f32,
        sy in 0.0..100.0f32,
    ) {
        let mut graph = build(n, &edges);
        let config = FruchtermanReingoldConfig::default().with_iterations(100);
        let mut layout = FruchtermanReingoldLayout::new(config);
        check_layout(&mut layout, &mut graph, (sx, sy))?;
    }

    #[test]
    fn siblings_keep_their_order_and_gap(
        children in prop::collection::vec((any::<prop::sample::Index>(), 10.0..120.0f32), 1..24),
        root_width in 10.0..120.0f32,
    ) {
        // node i hangs below a random earlier node
        let mut widths = vec![root_width];
        let mut graph = Graph::new();
        graph.add_node(0usize);
        for (parent, width) in &children {
            let child = widths.len();
            graph.add_edge(parent.index(child), child);
            widths.push(*width);
        }
        graph.measure(&|n: usize| Size::new(widths[n], 30.0));

        let config = BuchheimWalkerConfig {
            sibling_separation: SIBLING_GAP,
            ..BuchheimWalkerConfig::default()
        };
        BuchheimWalkerLayout::new(config)
            .run(&mut graph, 0.0, 0.0)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        for parent in 0..widths.len() {
            for pair in graph.successors_of(parent).windows(2) {
                let (left, right) = (pair[0], pair[1]);
                let (Some(l), Some(r)) = (graph.position(left), graph.position(right)) else {
                    return Err(TestCaseError::fail("sibling without a position"));
                };
                let gap = r.x - (l.x + widths[left]);
                prop_assert!(gap >= SIBLING_GAP - TOLERANCE, "{left} -> {right}: gap {gap}");
            }
        }
    }

    #[test]
    fn layered_segments_span_exactly_one_layer((n, edges) in graph_strategy()) {
        let mut graph = build(n, &edges);
        let mut layout = SugiyamaLayout::<u8>::default();
        layout
            .run(&mut graph, 0.0, 0.0)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        // real nodes and dummy bends both sit on the top line of their layer
        let mut rows: Vec<f32> = graph
            .nodes()
            .iter()
            .filter_map(|&v| graph.position(v))
            .map(|p| p.y)
            .chain(layout.routed_edges().iter().flat_map(|r| bends(r).iter().map(|p| p.y)))
            .collect();
        rows.sort_by(f32::total_cmp);
        rows.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
        let layer = |y: f32| rows.iter().position(|row| (row - y).abs() < TOLERANCE);

        for route in layout.routed_edges().iter().filter(|r| !r.reversed) {
            let source = graph.position(route.source);
            let destination = graph.position(route.destination);
            let (Some(s), Some(d)) = (source, destination) else {
                return Err(TestCaseError::fail("routed edge between unknown nodes"));
            };
            let (Some(first), Some(last)) = (layer(s.y), layer(d.y)) else {
                return Err(TestCaseError::fail("endpoint outside every layer"));
            };
            prop_assert!(last > first);
            prop_assert_eq!(route.points.len(), last - first + 1);
            for (i, bend) in bends(route).iter().enumerate() {
                prop_assert_eq!(layer(bend.y), Some(first + i + 1));
            }
        }
    }
}
