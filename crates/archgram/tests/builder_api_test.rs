//! Integration tests for the DiagramRenderer API
//!
//! These tests verify that the public API works and is usable.

use archgram::{
    ArchgramError, DiagramRenderer, LayoutEngine,
    config::{AppConfig, LayoutConfig, StyleConfig},
    identifier::Id,
    topology::{EdgeAttributes, EdgeStyle, NodeKind, OutputFormat, Topology},
};
use tempfile::tempdir;

fn small_topology() -> Topology {
    let mut topology = Topology::new("Small Stack");
    let users = topology.add_node("Users", NodeKind::Users, None).unwrap();
    let vpc = topology.add_cluster("AWS VPC", None).unwrap();
    let lb = topology
        .add_node("Load Balancer", NodeKind::LoadBalancer, Some(vpc))
        .unwrap();
    let db = topology
        .add_node("Database", NodeKind::Database, Some(vpc))
        .unwrap();

    topology.flow(users).to(lb).unwrap().labeled("HTTPS").to(db).unwrap();
    topology
        .add_edge(db, db, EdgeAttributes::new().with_style(EdgeStyle::Dotted))
        .unwrap();
    topology
}

#[test]
fn test_renderer_api_exists() {
    let _renderer = DiagramRenderer::default();
}

#[test]
fn test_render_svg() {
    let renderer = DiagramRenderer::default();
    let svg = renderer
        .render_svg(&small_topology())
        .expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Load Balancer"));
    assert!(svg.contains("HTTPS"));
    assert!(svg.contains("Small Stack"));
}

#[test]
fn test_layout_keeps_every_element() {
    let renderer = DiagramRenderer::default();
    let layout = renderer.layout(&small_topology()).unwrap();

    assert_eq!(layout.nodes().len(), 3);
    assert_eq!(layout.clusters().len(), 1);
    assert_eq!(layout.edges().len(), 3);
    assert_eq!(layout.title(), "Small Stack");
    assert!(layout.edges().iter().all(|edge| edge.points().len() >= 2));
}

#[test]
fn test_both_engines_render() {
    for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
        let config = AppConfig::new(LayoutConfig::new(engine), StyleConfig::default());
        let renderer = DiagramRenderer::new(config);
        let result = renderer.render_svg(&small_topology());
        assert!(result.is_ok(), "{engine:?}: {:?}", result.err());
    }
}

#[test]
fn test_invalid_reference_is_rejected() {
    let mut topology = small_topology();
    let result = topology.add_edge(Id::new("node_0"), Id::new("ghost"), EdgeAttributes::new());
    assert!(result.is_err());

    // The topology is left untouched and still renders
    let renderer = DiagramRenderer::default();
    assert!(renderer.render_svg(&topology).is_ok());
}

#[test]
fn test_invalid_style_is_config_error() {
    let config: AppConfig = toml::from_str("[style]\nbackground_color = \"nope\"\n").unwrap();
    let renderer = DiagramRenderer::new(config);
    assert!(matches!(
        renderer.render_svg(&small_topology()),
        Err(ArchgramError::Config(_))
    ));
}

#[test]
fn test_out_of_range_settings_are_config_errors() {
    for toml_source in [
        "[style]\nfont_size = 0\n",
        "[style]\nfont_size = 65535\n",
        "[layout]\nnode_spacing = -500.0\n",
        "[layout]\nrank_spacing = 0.0\n",
    ] {
        let config: AppConfig = toml::from_str(toml_source).unwrap();
        let renderer = DiagramRenderer::new(config);
        let result = renderer.render_svg(&small_topology());
        assert!(
            matches!(result, Err(ArchgramError::Config(_))),
            "{toml_source:?}: {result:?}"
        );
        assert!(matches!(
            renderer.layout(&small_topology()),
            Err(ArchgramError::Config(_))
        ));
    }
}

#[test]
fn test_render_to_file_names_output_after_title() {
    let dir = tempdir().expect("Failed to create temp directory");
    let renderer = DiagramRenderer::default();

    let path = renderer
        .render_to_file(&small_topology(), OutputFormat::Svg, dir.path())
        .unwrap();

    assert_eq!(path, dir.path().join("small_stack.svg"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("<svg"));
}

#[test]
fn test_renderer_reusability() {
    let config = AppConfig::new(LayoutConfig::new(LayoutEngine::Basic), StyleConfig::default());
    let renderer = DiagramRenderer::new(config);

    let first = renderer.layout(&small_topology()).unwrap();
    let second = renderer.layout(&small_topology()).unwrap();
    assert_eq!(first.nodes(), second.nodes(), "Layout should be deterministic");
    assert_eq!(first.edges(), second.edges());
}

#[cfg(feature = "graphviz")]
#[test]
fn test_render_dot() {
    let renderer = DiagramRenderer::default();
    let dot = renderer.render_dot(&small_topology()).unwrap();

    assert!(dot.contains("digraph"));
    assert!(dot.contains("subgraph cluster_0"));
    assert!(dot.contains("\"HTTPS\""));
}

#[cfg(not(feature = "graphviz"))]
#[test]
fn test_dot_needs_graphviz_feature() {
    let renderer = DiagramRenderer::default();
    assert!(matches!(
        renderer.render(&small_topology(), OutputFormat::Dot),
        Err(ArchgramError::Export(_))
    ));
}
