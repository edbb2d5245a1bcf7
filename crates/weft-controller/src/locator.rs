//! Idempotent locate-or-create access to the shared controller resources.
//!
//! All three operations follow the same shape: read by fully-qualified
//! name, and only on a [`Lookup::Missing`] answer construct the resource
//! with its minimum required fields and create it. Calling any operation
//! twice with identical inputs yields the same resource and issues at most
//! one create in total.

use std::net::Ipv4Addr;

use weft_common::error::Result;

use crate::resources::{AddressManager, ComputeNode, Project, SubnetBlock, VirtualNetwork};
use crate::session::{ControllerApi, Lookup};

/// Locate-or-create access to compute nodes, projects, and networks.
///
/// Borrows an established API session; holds no other state.
#[derive(Debug)]
pub struct ResourceLocator<'a, S> {
    session: &'a S,
}

impl<'a, S: ControllerApi> ResourceLocator<'a, S> {
    /// Creates a locator over the given session.
    #[must_use]
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// Ensures this host is registered as a compute node on the overlay.
    ///
    /// # Errors
    ///
    /// Propagates controller failures verbatim; never retries.
    pub fn locate_compute_node(&self, hostname: &str, ip: Ipv4Addr) -> Result<ComputeNode> {
        match self.session.read(&ComputeNode::fqn(hostname))? {
            Lookup::Found(node) => Ok(node),
            Lookup::Missing => {
                tracing::debug!(hostname, %ip, "registering compute node");
                self.session.create(&ComputeNode::new(hostname, ip))
            }
        }
    }

    /// Ensures the project for a pod namespace exists.
    ///
    /// # Errors
    ///
    /// Propagates controller failures verbatim; never retries.
    pub fn locate_project(&self, name: &str) -> Result<Project> {
        match self.session.read(&Project::fqn(name))? {
            Lookup::Found(project) => Ok(project),
            Lookup::Missing => {
                tracing::debug!(project = name, "creating project");
                self.session.create(&Project::new(name))
            }
        }
    }

    /// Ensures the named network exists under a project.
    ///
    /// First-time creation locates-or-creates the project's address manager
    /// and attaches the given subnet before the network is persisted;
    /// subsequent calls leave the existing network untouched.
    ///
    /// # Errors
    ///
    /// Propagates controller failures and malformed subnets.
    pub fn locate_network(
        &self,
        project: &Project,
        name: &str,
        subnet: &str,
    ) -> Result<VirtualNetwork> {
        match self.session.read(&project.fq_name.child(name))? {
            Lookup::Found(network) => Ok(network),
            Lookup::Missing => {
                let manager = self.locate_address_manager(project)?;
                let mut network = VirtualNetwork::new(project, name);
                network.attach_subnet(&manager, SubnetBlock::parse(subnet)?);
                tracing::debug!(network = %network.fq_name, subnet, "creating network");
                self.session.create(&network)
            }
        }
    }

    fn locate_address_manager(&self, project: &Project) -> Result<AddressManager> {
        match self.session.read(&AddressManager::fqn(project))? {
            Lookup::Found(manager) => Ok(manager),
            Lookup::Missing => self.session.create(&AddressManager::new(project)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Resource;
    use crate::testing::FakeSession;

    #[test]
    fn locate_project_is_idempotent() {
        let session = FakeSession::default();
        let locator = ResourceLocator::new(&session);

        let first = locator.locate_project("team-a").expect("first locate");
        let second = locator.locate_project("team-a").expect("second locate");

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(session.creates(), 1);
    }

    #[test]
    fn locate_network_attaches_subnet_on_first_creation() {
        let session = FakeSession::default();
        let locator = ResourceLocator::new(&session);
        let project = locator.locate_project("team-a").expect("project");

        let network = locator
            .locate_network(&project, "default", "10.0.0.0/8")
            .expect("network");

        assert_eq!(network.fq_name.to_string(), "default-domain:team-a:default");
        assert_eq!(network.ipam_refs.len(), 1);
        assert_eq!(
            network.ipam_refs[0].subnets,
            vec![SubnetBlock::parse("10.0.0.0/8").expect("subnet")]
        );
        // project + address manager + network
        assert_eq!(session.creates(), 3);
    }

    #[test]
    fn locate_network_twice_creates_once() {
        let session = FakeSession::default();
        let locator = ResourceLocator::new(&session);
        let project = locator.locate_project("team-a").expect("project");

        let first = locator
            .locate_network(&project, "default", "10.0.0.0/8")
            .expect("first");
        let second = locator
            .locate_network(&project, "default", "10.0.0.0/8")
            .expect("second");

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(session.creates(), 3);
    }

    #[test]
    fn locate_compute_node_registers_host_once() {
        let session = FakeSession::default();
        let locator = ResourceLocator::new(&session);
        let ip = "192.168.0.10".parse().expect("addr");

        let node = locator.locate_compute_node("node-1", ip).expect("node");
        let again = locator.locate_compute_node("node-1", ip).expect("again");

        assert_eq!(node.uuid, again.uuid);
        assert_eq!(node.ip_address, ip);
        assert_eq!(session.creates(), 1);
    }

    #[test]
    fn controller_failure_propagates() {
        let session = FakeSession::default();
        session.poison();
        let locator = ResourceLocator::new(&session);

        let err = locator.locate_project("team-a");
        assert!(err.is_err());
        assert!(!session.contains(Project::KIND, &Project::fqn("team-a")));
    }

    #[test]
    fn malformed_subnet_is_rejected_before_network_create() {
        let session = FakeSession::default();
        let locator = ResourceLocator::new(&session);
        let project = locator.locate_project("team-a").expect("project");
        let creates_before_network = session.creates();

        let result = locator.locate_network(&project, "default", "bogus");

        assert!(result.is_err());
        // the address manager create may have happened, the network one not
        assert!(!session.contains(
            crate::resources::VirtualNetwork::KIND,
            &project.fq_name.child("default")
        ));
        assert!(session.creates() <= creates_before_network + 1);
    }
}
