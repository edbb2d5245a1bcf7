//! Wire-level model of the controller resource graph.
//!
//! Every resource carries a fully-qualified name addressing it in the
//! hierarchy, and a controller-assigned UUID once persisted. Objects
//! returned by reads are snapshots of controller state at the moment of the
//! call; back-reference collections are not kept consistent across
//! subsequent mutations within the same operation.

use std::fmt;
use std::net::Ipv4Addr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use weft_common::constants::{DEFAULT_ADDRESS_MANAGER, GLOBAL_SYSTEM_CONFIG, ROOT_DOMAIN};
use weft_common::error::{Result, WeftError};
use weft_common::types::ShortId;

/// Fully-qualified resource name: an ordered path of name segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fqn(Vec<String>);

impl Fqn {
    /// Builds a name from path segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a new name with one more trailing segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Returns the final segment, the resource's local name.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }
}

impl fmt::Display for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

/// Common behavior of every controller resource.
pub trait Resource: Serialize + DeserializeOwned + Clone {
    /// Resource kind segment used in API paths.
    const KIND: &'static str;

    /// The resource's fully-qualified name.
    fn fq_name(&self) -> &Fqn;

    /// Controller-assigned UUID, absent until the resource is persisted.
    fn uuid(&self) -> Option<&str>;

    /// Returns the UUID or an error when the resource was never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::NotFound`] for an unpersisted resource.
    fn require_uuid(&self) -> Result<&str> {
        self.uuid().ok_or_else(|| WeftError::NotFound {
            kind: Self::KIND,
            id: self.fq_name().to_string(),
        })
    }
}

/// A host registered on the overlay, never deleted by this workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeNode {
    /// `[default-global-system-config, hostname]`.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Overlay-facing address of the host.
    pub ip_address: Ipv4Addr,
}

impl ComputeNode {
    /// Builds an unpersisted compute node record for this host.
    #[must_use]
    pub fn new(hostname: &str, ip_address: Ipv4Addr) -> Self {
        Self {
            fq_name: Fqn::new([GLOBAL_SYSTEM_CONFIG, hostname]),
            uuid: None,
            ip_address,
        }
    }

    /// Fully-qualified name for a host, usable before the resource exists.
    #[must_use]
    pub fn fqn(hostname: &str) -> Fqn {
        Fqn::new([GLOBAL_SYSTEM_CONFIG, hostname])
    }
}

impl Resource for ComputeNode {
    const KIND: &'static str = "virtual-router";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

/// Isolation domain mapped 1:1 to a pod namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// `[default-domain, pod_namespace]`.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl Project {
    /// Builds an unpersisted project record.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            fq_name: Self::fqn(name),
            uuid: None,
        }
    }

    /// Fully-qualified name for a project, usable before the resource exists.
    #[must_use]
    pub fn fqn(name: &str) -> Fqn {
        Fqn::new([ROOT_DOMAIN, name])
    }
}

impl Resource for Project {
    const KIND: &'static str = "project";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

/// Per-project address-management object owning subnet allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressManager {
    /// Project fqn + the fixed manager name.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl AddressManager {
    /// Builds an unpersisted address manager scoped to a project.
    #[must_use]
    pub fn new(project: &Project) -> Self {
        Self {
            fq_name: Self::fqn(project),
            uuid: None,
        }
    }

    /// Fully-qualified name of a project's address manager.
    #[must_use]
    pub fn fqn(project: &Project) -> Fqn {
        project.fq_name.child(DEFAULT_ADDRESS_MANAGER)
    }
}

impl Resource for AddressManager {
    const KIND: &'static str = "network-ipam";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

/// An IPv4 prefix block attached to a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetBlock {
    /// Network prefix.
    pub prefix: Ipv4Addr,
    /// Prefix length in bits.
    pub prefix_len: u8,
}

impl SubnetBlock {
    /// Parses CIDR notation such as `10.0.0.0/8`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed prefixes or lengths.
    pub fn parse(cidr: &str) -> Result<Self> {
        let invalid = || WeftError::Config {
            message: format!("invalid subnet: {cidr}"),
        };
        let (prefix, len) = cidr.split_once('/').ok_or_else(invalid)?;
        Ok(Self {
            prefix: prefix.parse().map_err(|_| invalid())?,
            prefix_len: len.parse().map_err(|_| invalid())?,
        })
    }
}

/// Link from a network to its address manager, carrying the subnet blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressManagerRef {
    /// Fully-qualified name of the address manager.
    pub to: Fqn,
    /// Subnet blocks assigned through this manager.
    pub subnets: Vec<SubnetBlock>,
}

/// L3 broadcast domain within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualNetwork {
    /// Project fqn + network name.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Address-manager links with their subnet blocks.
    #[serde(default)]
    pub ipam_refs: Vec<AddressManagerRef>,
}

impl VirtualNetwork {
    /// Builds an unpersisted network record under a project.
    #[must_use]
    pub fn new(project: &Project, name: &str) -> Self {
        Self {
            fq_name: project.fq_name.child(name),
            uuid: None,
            ipam_refs: Vec::new(),
        }
    }

    /// Attaches a subnet block through the given address manager.
    pub fn attach_subnet(&mut self, manager: &AddressManager, block: SubnetBlock) {
        self.ipam_refs.push(AddressManagerRef {
            to: manager.fq_name.clone(),
            subnets: vec![block],
        });
    }
}

impl Resource for VirtualNetwork {
    const KIND: &'static str = "virtual-network";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

/// Reference entry in a back-reference list, as returned by reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefEntry {
    /// UUID of the referencing resource.
    pub uuid: String,
    /// Fully-qualified name of the referencing resource.
    pub to: Fqn,
}

/// Controller-side record of one running container instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    /// `[short_id]`.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Interfaces attached to this workload, populated on read.
    #[serde(default)]
    pub interface_back_refs: Vec<RefEntry>,
}

impl Workload {
    /// Builds an unpersisted workload record keyed by the short id.
    #[must_use]
    pub fn new(id: &ShortId) -> Self {
        Self {
            fq_name: Fqn::new([id.as_str()]),
            uuid: None,
            interface_back_refs: Vec::new(),
        }
    }

    /// Fully-qualified name of a workload, usable before the resource exists.
    #[must_use]
    pub fn fqn(id: &ShortId) -> Fqn {
        Fqn::new([id.as_str()])
    }
}

impl Resource for Workload {
    const KIND: &'static str = "virtual-machine";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

/// Address allocated to an interface by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedAddress {
    /// Assigned IPv4 address.
    pub ip: Ipv4Addr,
    /// Prefix length of the containing subnet.
    pub prefix_len: u8,
}

/// Attachment point of a workload on a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    /// Workload fqn + logical interface name.
    pub fq_name: Fqn,
    /// Controller-assigned identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Owning workload.
    pub workload_ref: Fqn,
    /// Network this interface attaches to.
    pub network_ref: Fqn,
    /// Addresses assigned by the controller.
    #[serde(default)]
    pub addresses: Vec<AllocatedAddress>,
}

impl Interface {
    /// Builds an unpersisted interface record for a workload on a network.
    #[must_use]
    pub fn new(workload: &Workload, network: &VirtualNetwork, name: &str) -> Self {
        Self {
            fq_name: workload.fq_name.child(name),
            uuid: None,
            workload_ref: workload.fq_name.clone(),
            network_ref: network.fq_name.clone(),
            addresses: Vec::new(),
        }
    }
}

impl Resource for Interface {
    const KIND: &'static str = "virtual-machine-interface";

    fn fq_name(&self) -> &Fqn {
        &self.fq_name
    }

    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqn_display_joins_with_colons() {
        let fqn = Fqn::new(["default-domain", "team-a"]).child("default");
        assert_eq!(fqn.to_string(), "default-domain:team-a:default");
        assert_eq!(fqn.leaf(), "default");
    }

    #[test]
    fn project_fqn_is_rooted_in_default_domain() {
        let project = Project::new("team-a");
        assert_eq!(project.fq_name.to_string(), "default-domain:team-a");
    }

    #[test]
    fn compute_node_fqn_is_rooted_in_global_config() {
        let fqn = ComputeNode::fqn("node-1");
        assert_eq!(fqn.to_string(), "default-global-system-config:node-1");
    }

    #[test]
    fn subnet_block_parses_cidr() {
        let block = SubnetBlock::parse("10.0.0.0/8").expect("valid cidr");
        assert_eq!(block.prefix, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(block.prefix_len, 8);
    }

    #[test]
    fn subnet_block_rejects_garbage() {
        assert!(SubnetBlock::parse("10.0.0.0").is_err());
        assert!(SubnetBlock::parse("not-a-subnet/8").is_err());
        assert!(SubnetBlock::parse("10.0.0.0/xx").is_err());
    }

    #[test]
    fn interface_is_scoped_under_workload() {
        let id = weft_common::types::ContainerId::new("abcdef0123456789")
            .short()
            .expect("short id");
        let workload = Workload::new(&id);
        let project = Project::new("team-a");
        let network = VirtualNetwork::new(&project, "default");
        let iface = Interface::new(&workload, &network, "veth0");
        assert_eq!(iface.fq_name.to_string(), "abcdef01234:veth0");
        assert_eq!(iface.network_ref.to_string(), "default-domain:team-a:default");
    }

    #[test]
    fn require_uuid_fails_for_unpersisted_resource() {
        let project = Project::new("team-a");
        assert!(project.require_uuid().is_err());
    }
}
