// Unit tests for graph construction and GEXF serialization.

use replygraph::graph::accumulator::InteractionMap;
use replygraph::graph::gexf::{build_graph, render_gexf, write_gexf};

use petgraph::visit::EdgeRef;

fn two_reply_map() -> InteractionMap {
    let mut acc = InteractionMap::new();
    acc.record("alice", "root", "first interaction");
    acc.record("alice", "root", "second interaction");
    acc
}

#[test]
fn repeated_pair_collapses_to_one_weighted_edge() {
    let graph = build_graph(&two_reply_map());

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);

    let edge = graph.edge_references().next().unwrap();
    assert_eq!(edge.weight().weight, 2);
    assert_eq!(
        edge.weight().comments,
        vec!["first interaction", "second interaction"]
    );
}

#[test]
fn nodes_appear_once_across_many_edges() {
    let mut acc = InteractionMap::new();
    acc.record("alice", "root", "to root");
    acc.record("alice", "bob", "to bob");
    acc.record("bob", "root", "bob to root");

    let graph = build_graph(&acc);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn gexf_carries_weight_and_comments_list() {
    let xml = render_gexf(&build_graph(&two_reply_map())).unwrap();

    assert!(xml.contains("source=\"alice\" target=\"root\" weight=\"2\""));
    // comments_list is the JSON rendering of the text list
    assert!(xml.contains("first interaction"));
    assert!(xml.contains("second interaction"));
    assert!(xml.contains("title=\"comments_list\""));
}

#[test]
fn gexf_declares_a_directed_static_graph() {
    let xml = render_gexf(&build_graph(&two_reply_map())).unwrap();

    assert!(xml.contains("xmlns=\"http://www.gexf.net/1.2draft\""));
    assert!(xml.contains("defaultedgetype=\"directed\""));
    assert!(xml.contains("mode=\"static\""));
}

#[test]
fn reverse_direction_is_a_separate_edge() {
    let mut acc = InteractionMap::new();
    acc.record("alice", "root", "one way");
    acc.record("root", "alice", "the other way");

    let graph = build_graph(&acc);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 2);

    let xml = render_gexf(&graph).unwrap();
    assert!(xml.contains("source=\"alice\" target=\"root\""));
    assert!(xml.contains("source=\"root\" target=\"alice\""));
}

#[test]
fn write_overwrites_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.gexf");

    let mut first = InteractionMap::new();
    first.record("alice", "root", "from the first run");
    first.record("bob", "root", "also first run");
    write_gexf(&build_graph(&first), &path).unwrap();

    let mut second = InteractionMap::new();
    second.record("carol", "root", "second run only");
    write_gexf(&build_graph(&second), &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("carol"));
    assert!(!contents.contains("alice"));
}
