use graphview_layout::{
    edge_stroke, BuchheimWalkerConfig, BuchheimWalkerLayout, FruchtermanReingoldLayout, Graph,
    Layout, LayoutError, Orientation, Point, Shape, Size, SugiyamaConfig, SugiyamaLayout,
};
use test_log::test;

fn engines() -> Vec<(&'static str, Box<dyn Layout<&'static str>>)> {
    vec![
        ("tree", Box::new(BuchheimWalkerLayout::<&'static str>::default())),
        ("layered", Box::new(SugiyamaLayout::<&'static str>::default())),
        ("force", Box::new(FruchtermanReingoldLayout::default())),
    ]
}

#[test]
fn tree_root_over_three_children() {
    let mut graph = Graph::new();
    graph.add_edges([("root", "a"), ("root", "b"), ("root", "c")]);
    graph.measure(&Size::new(50.0, 20.0));

    let mut layout = BuchheimWalkerLayout::default();
    layout.run(&mut graph, 0.0, 0.0).unwrap();

    let root = graph.node("root").unwrap().bounds();
    let children: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| graph.node(*n).unwrap().bounds())
        .collect();

    for child in &children {
        // one level separation below the root
        assert_eq!(child.y - root.bottom(), 100.0);
    }
    for pair in children.windows(2) {
        assert!(pair[1].x - pair[0].x >= 150.0);
    }
    let middle = (children[0].center().x + children[2].center().x) / 2.0;
    assert_eq!(root.center().x, middle);
}

#[test]
fn layered_disjoint_edges() {
    let mut graph = Graph::new();
    graph.add_edges([("a", "b"), ("c", "d")]);
    graph.measure(&Size::new(50.0, 20.0));

    let mut layout = SugiyamaLayout::default();
    layout.run(&mut graph, 0.0, 0.0).unwrap();
    let stats = layout.stats();

    assert_eq!(stats.layers, 2);
    assert_eq!(stats.dummies, 0);
    assert_eq!(stats.crossings, 0);
    assert_eq!(graph.node_count(), 4);
    assert!(layout.routed_edges().iter().all(|r| r.points.len() == 2));

    let y = |n| graph.position(n).unwrap().y;
    assert_eq!(y("a"), y("c"));
    assert_eq!(y("b"), y("d"));
    assert!(y("b") > y("a"));
}

#[test]
fn single_node_in_every_engine() {
    for (name, mut layout) in engines() {
        let mut graph = Graph::new();
        graph.add_node("only");
        graph.set_node_size("only", Size::new(64.0, 48.0)).unwrap();

        let size = layout.run(&mut graph, 30.0, 15.0).unwrap();

        assert_eq!(size, Size::new(64.0, 48.0), "{name}");
        assert_eq!(graph.position("only"), Some(Point::new(30.0, 15.0)), "{name}");
    }
}

#[test]
fn empty_graphs() {
    for (name, mut layout) in engines() {
        let mut graph = Graph::new();
        let result = layout.run(&mut graph, 0.0, 0.0);
        if name == "tree" {
            assert!(matches!(result, Err(LayoutError::Graph(_))));
        } else {
            assert_eq!(result, Ok(Size::zero()), "{name}");
        }
    }
}

#[test]
fn every_engine_draws_after_running() {
    for (name, mut layout) in engines() {
        let mut graph = Graph::new();
        graph.add_edges([("a", "b"), ("a", "c"), ("c", "d")]);
        graph.measure(&Size::new(40.0, 40.0));
        layout.run(&mut graph, 0.0, 0.0).unwrap();

        let mut surface: Vec<Shape> = Vec::new();
        layout.draw_edges(&mut surface, &graph, edge_stroke());
        assert!(surface.len() >= graph.edge_count(), "{name}: {surface:?}");
    }
}

#[test]
fn removing_a_subtree_before_relayout() {
    let mut graph = Graph::new();
    graph.add_edges([(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)]);
    graph.measure(&Size::new(30.0, 30.0));

    let removed = graph.remove_subtree(1).unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(graph.nodes(), &[0, 2, 5]);

    let mut layout = BuchheimWalkerLayout::default();
    layout.run(&mut graph, 0.0, 0.0).unwrap();
    assert_eq!(layout.depth_of(5), Some(2));
    assert_eq!(layout.depth_of(3), None);
}

#[test]
fn sideways_tree_grows_to_the_right() {
    let mut graph = Graph::new();
    graph.add_edges([("root", "a"), ("root", "b")]);
    graph.measure(&Size::new(50.0, 20.0));

    let config = BuchheimWalkerConfig::default()
        .with_orientation(Orientation::LeftRight)
        .with_level_separation(40.0);
    let mut layout = BuchheimWalkerLayout::new(config);
    layout.run(&mut graph, 0.0, 0.0).unwrap();

    let root = graph.node("root").unwrap().bounds();
    let a = graph.node("a").unwrap().bounds();
    let b = graph.node("b").unwrap().bounds();
    assert_eq!(a.x, b.x);
    assert!(a.x > root.right());
    assert!(b.y > a.y);
}

#[test]
fn unordered_layers_without_crossing_rounds() {
    let mut graph = Graph::new();
    graph.add_edges([("a", "d"), ("b", "c")]);
    graph.add_node("x");
    graph.measure(&Size::new(40.0, 40.0));

    let config = SugiyamaConfig::default().with_crossing_iterations(0);
    let mut layout = SugiyamaLayout::new(config);
    layout.run(&mut graph, 0.0, 0.0).unwrap();

    let stats = layout.stats();
    assert_eq!(stats.crossings, stats.initial_crossings);
    assert_eq!(layout.routed_edges().len(), 2);
}
