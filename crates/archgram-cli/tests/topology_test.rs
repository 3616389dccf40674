//! Checks the declared AWS VPC architecture against the intended topology.

use archgram::topology::{Edge, NodeKind, Topology};

use archgram_cli::architecture::aws_vpc_architecture;

fn topology() -> Topology {
    aws_vpc_architecture().expect("Architecture should declare without errors")
}

/// Declared edges as `(source label, target label, edge label)`.
fn labeled_edges(topology: &Topology) -> Vec<(String, String, Option<String>)> {
    let name = |edge: &Edge, source: bool| {
        let id = if source { edge.source() } else { edge.target() };
        topology
            .node(id)
            .map(|node| node.label().to_string())
            .unwrap_or_default()
    };
    topology
        .edges()
        .iter()
        .map(|edge| {
            (
                name(edge, true),
                name(edge, false),
                edge.label().map(str::to_string),
            )
        })
        .collect()
}

fn count(edges: &[(String, String, Option<String>)], source: &str, target: &str) -> usize {
    edges
        .iter()
        .filter(|(from, to, _)| from == source && to == target)
        .count()
}

#[test]
fn test_element_counts() {
    let topology = topology();
    assert_eq!(topology.nodes().len(), 12);
    assert_eq!(topology.clusters().len(), 7);
    assert_eq!(topology.edges().len(), 17);
}

#[test]
fn test_single_edge_from_end_users() {
    let edges = labeled_edges(&topology());
    assert_eq!(count(&edges, "End Users", "Network Firewall"), 1);
    assert_eq!(
        edges.iter().filter(|(from, _, _)| from == "End Users").count(),
        1
    );
}

#[test]
fn test_single_postgres_edge_from_kubernetes() {
    let edges = labeled_edges(&topology());
    let postgres: Vec<_> = edges
        .iter()
        .filter(|(from, to, label)| {
            from == "Kubernetes Cluster"
                && to == "RDS Database"
                && label.as_deref() == Some("Postgres port")
        })
        .collect();
    assert_eq!(postgres.len(), 1);
}

#[test]
fn test_duplicate_edges_are_kept() {
    let edges = labeled_edges(&topology());
    assert_eq!(count(&edges, "Network Firewall", "Internet Gateway"), 3);
    assert_eq!(count(&edges, "Internet Gateway", "External Load Balancer"), 2);
    assert_eq!(count(&edges, "External Load Balancer", "Kubernetes Cluster"), 2);
}

#[test]
fn test_edge_labels() {
    let edges = labeled_edges(&topology());
    let label_of = |source: &str, target: &str| -> Vec<Option<String>> {
        edges
            .iter()
            .filter(|(from, to, _)| from == source && to == target)
            .map(|(_, _, label)| label.clone())
            .collect()
    };

    assert_eq!(
        label_of("External Load Balancer", "Kubernetes Cluster"),
        vec![None, Some("port 6443".to_string())]
    );
    assert_eq!(
        label_of("Internet Gateway", "RDS Database"),
        vec![Some("Postgres port".to_string())]
    );
    assert_eq!(
        label_of("Bastion Host/VPN Clients", "Internet Gateway"),
        vec![Some("SSH".to_string())]
    );
    assert_eq!(edges.iter().filter(|(_, _, label)| label.is_some()).count(), 4);
}

#[test]
fn test_outbound_path_through_nat() {
    let edges = labeled_edges(&topology());
    assert_eq!(count(&edges, "Kubernetes Cluster", "NAT Gateway"), 1);
    assert_eq!(count(&edges, "NAT Gateway", "Internet Gateway"), 1);
    assert_eq!(count(&edges, "Internet Gateway", "Mailgun"), 1);
}

#[test]
fn test_cluster_nesting() {
    let topology = topology();
    let cluster_of = |label: &str| {
        topology
            .nodes()
            .find(|node| node.label() == label)
            .and_then(|node| node.parent())
            .and_then(|parent| topology.cluster(parent))
            .map(|cluster| cluster.label().to_string())
    };

    assert_eq!(cluster_of("Internet Gateway").as_deref(), Some("AWS VPC"));
    assert_eq!(cluster_of("NAT Gateway").as_deref(), Some("Public Subnet"));
    assert_eq!(
        cluster_of("External Load Balancer").as_deref(),
        Some("Security Group: SGALB")
    );
    assert_eq!(
        cluster_of("RDS Database").as_deref(),
        Some("Security Group: SGDB")
    );
    assert_eq!(cluster_of("End Users"), None);
    assert_eq!(cluster_of("Mailgun"), None);

    let sgdb = topology
        .clusters()
        .find(|cluster| cluster.label() == "Security Group: SGDB")
        .unwrap();
    assert_eq!(topology.cluster_depth(sgdb.id()), 2);
}

#[test]
fn test_icons() {
    let topology = topology();
    let kind_of = |label: &str| {
        topology
            .nodes()
            .find(|node| node.label() == label)
            .map(|node| node.kind())
    };

    assert_eq!(kind_of("Mailgun"), Some(NodeKind::Chat));
    assert_eq!(kind_of("Bastion Host/VPN Clients"), Some(NodeKind::Users));
    assert_eq!(kind_of("Main VPC"), Some(NodeKind::Vpc));
    assert_eq!(kind_of("Kubernetes Cluster"), Some(NodeKind::Kubernetes));
}

#[test]
fn test_rebuild_is_identical() {
    let first = labeled_edges(&topology());
    let second = labeled_edges(&topology());
    assert_eq!(first, second);

    let labels = |topology: &Topology| {
        topology
            .nodes()
            .map(|node| node.label().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(labels(&topology()), labels(&topology()));
}
