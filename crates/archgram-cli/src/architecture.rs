//! The AWS VPC architecture diagram.
//!
//! External users and services reach the VPC through a network firewall and
//! the internet gateway. Inside the VPC a public subnet holds the NAT
//! gateway, the external load balancer and the bastion hosts, each in its
//! own security group. A private subnet holds the Kubernetes cluster and the
//! RDS database.
//!
//! Security group rules carried by the edges:
//!
//! - SGAPP accepts port 6443 from SGBastion only and talks to SGDB on the
//!   Postgres port only.
//! - SGDB accepts the Postgres port from SGAPP and the Data Science IPs.
//! - SGBastion accepts SSH only from team members' IPs.

use log::debug;

use archgram::topology::{Direction, EdgeAttributes, NodeKind, Topology, TopologyError};

pub const TITLE: &str = "AWS VPC Architecture";

const POSTGRES_PORT: &str = "Postgres port";

/// Declares the AWS VPC architecture.
///
/// Nodes and clusters are declared before the edges that use them, so every
/// reference is checked against an existing element.
pub fn aws_vpc_architecture() -> Result<Topology, TopologyError> {
    let mut topology = Topology::new(TITLE).with_direction(Direction::LeftRight);

    // External users and services
    let end_users = topology.add_node("End Users", NodeKind::Users, None)?;
    let developers = topology.add_node("Developers", NodeKind::Users, None)?;
    let data_science = topology.add_node("Data Science", NodeKind::Users, None)?;
    let mailgun = topology.add_node("Mailgun", NodeKind::Chat, None)?;

    let firewall = topology.add_node("Network Firewall", NodeKind::Firewall, None)?;

    let vpc = topology.add_cluster("AWS VPC", None)?;
    topology.add_node("Main VPC", NodeKind::Vpc, Some(vpc))?;
    let igw = topology.add_node("Internet Gateway", NodeKind::InternetGateway, Some(vpc))?;

    let public_subnet = topology.add_cluster("Public Subnet", Some(vpc))?;
    let nat = topology.add_node("NAT Gateway", NodeKind::NatGateway, Some(public_subnet))?;
    let sg_alb = topology.add_cluster("Security Group: SGALB", Some(public_subnet))?;
    let lb = topology.add_node("External Load Balancer", NodeKind::LoadBalancer, Some(sg_alb))?;
    let sg_bastion = topology.add_cluster("Security Group: SGBastion", Some(public_subnet))?;
    let bastion = topology.add_node("Bastion Host/VPN Clients", NodeKind::Users, Some(sg_bastion))?;

    let private_subnet = topology.add_cluster("Private Subnet", Some(vpc))?;
    let sg_app = topology.add_cluster("Security Group: SGAPP", Some(private_subnet))?;
    let k8s = topology.add_node("Kubernetes Cluster", NodeKind::Kubernetes, Some(sg_app))?;
    let sg_db = topology.add_cluster("Security Group: SGDB", Some(private_subnet))?;
    let db = topology.add_node("RDS Database", NodeKind::Database, Some(sg_db))?;

    topology
        .flow(end_users)
        .to(firewall)?
        .to(igw)?
        .to(lb)?
        .to(k8s)?;
    topology
        .flow(developers)
        .to(firewall)?
        .to(igw)?
        .to(lb)?
        .labeled("port 6443")
        .to(k8s)?;
    topology
        .flow(data_science)
        .to(firewall)?
        .to(igw)?
        .labeled(POSTGRES_PORT)
        .to(db)?;
    topology.flow(bastion).labeled("SSH").to(igw)?.to(k8s)?;
    topology.flow(k8s).to(nat)?.to(igw)?.to(mailgun)?;
    topology.add_edge(k8s, db, EdgeAttributes::new().with_label(POSTGRES_PORT))?;

    debug!(
        nodes = topology.nodes().len(),
        clusters = topology.clusters().len(),
        edges = topology.edges().len();
        "Architecture declared"
    );
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_declares() {
        let topology = aws_vpc_architecture().unwrap();
        assert_eq!(topology.title(), TITLE);
        assert_eq!(topology.direction(), Direction::LeftRight);
        assert_eq!(topology.file_stem(), "aws_vpc_architecture");
        assert!(topology.validate().is_ok());
    }
}
