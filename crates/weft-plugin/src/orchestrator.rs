//! The attach/detach state machine.
//!
//! `setup` walks Unattached → Provisioning → Wired → Attached; `teardown`
//! unwinds Attached → Unregistering → Deprovisioning → Unattached. There is
//! no rollback on partial failure: every provisioning step is idempotent
//! locate-or-create, so re-running `setup` resumes from whatever already
//! exists. Teardown ordering is load-bearing: forwarding entries are
//! dropped before their interfaces are deleted, and interfaces before the
//! workload.

use std::net::Ipv4Addr;

use weft_common::config::WeftConfig;
use weft_common::error::{Result, WeftError};
use weft_common::types::{ContainerId, PodRef, ShortId};
use weft_controller::locator::ResourceLocator;
use weft_controller::provisioner::WorkloadProvisioner;
use weft_controller::resources::ComputeNode;
use weft_controller::session::ControllerApi;
use weft_net::forwarding::ForwardingRegistrar;
use weft_net::netns::NamespaceManager;

use crate::runtime::ContainerRuntime;

/// Sequences controller provisioning, namespace wiring, and forwarding
/// registration for one plugin invocation.
#[derive(Debug)]
pub struct Orchestrator<S, N, F, R> {
    session: S,
    netns: N,
    forwarding: F,
    runtime: R,
    config: WeftConfig,
}

impl<S, N, F, R> Orchestrator<S, N, F, R>
where
    S: ControllerApi,
    N: NamespaceManager,
    F: ForwardingRegistrar,
    R: ContainerRuntime,
{
    /// Creates an orchestrator owning its collaborators for one invocation.
    #[must_use]
    pub fn new(session: S, netns: N, forwarding: F, runtime: R, config: WeftConfig) -> Self {
        Self {
            session,
            netns,
            forwarding,
            runtime,
            config,
        }
    }

    /// Registers this host as a compute node on the overlay.
    ///
    /// # Errors
    ///
    /// Propagates controller failures.
    pub fn init(&self, hostname: &str, local_ip: Ipv4Addr) -> Result<ComputeNode> {
        ResourceLocator::new(&self.session).locate_compute_node(hostname, local_ip)
    }

    /// Attaches a container to the overlay network.
    ///
    /// Input validation and pid resolution run before any controller
    /// mutation; after that, each step either finds existing state or
    /// creates it. A failure aborts the operation and leaves prior steps in
    /// place for the next invocation to resume from.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step; no rollback is attempted.
    pub fn setup(&self, pod: &PodRef, container: &ContainerId) -> Result<()> {
        let id = container.short()?;
        let pid = self.runtime.container_pid(container)?;
        if pid == 0 {
            return Err(WeftError::Config {
                message: format!("container {container} not yet started"),
            });
        }

        let locator = ResourceLocator::new(&self.session);
        let project = locator.locate_project(&pod.namespace)?;
        let network =
            locator.locate_network(&project, &self.config.network_name, &self.config.subnet)?;

        self.netns.link_namespace(&id, pid)?;

        let provisioner = WorkloadProvisioner::new(&self.session);
        let workload = provisioner.locate_workload(&id)?;
        let iface =
            provisioner.locate_interface(&workload, &network, &self.config.interface_name)?;

        let host_device = self.netns.create_interface(&id, &self.config.interface_name)?;
        self.forwarding.register(&workload, &iface, &host_device)?;

        let (ip, prefix_len) = provisioner.resolve_address(&iface)?;
        self.netns
            .configure_interface(&id, &self.config.interface_name, ip, prefix_len)?;

        tracing::info!(%pod, %id, %ip, prefix_len, "container attached");
        Ok(())
    }

    /// Detaches a container from the overlay network.
    ///
    /// A container that was never set up, or already torn down, is handled
    /// as an ordinary no-op. The namespace link is removed even when the
    /// controller-side unwind fails partway.
    ///
    /// # Errors
    ///
    /// Returns the first controller-side failure, after the namespace
    /// removal has been attempted.
    pub fn teardown(&self, pod: &PodRef, container: &ContainerId) -> Result<()> {
        let id = container.short()?;
        let unwind = self.unwind_controller(&id);
        let namespace = self.netns.remove_namespace(&id);
        unwind.and(namespace)?;
        tracing::info!(%pod, %id, "container detached");
        Ok(())
    }

    fn unwind_controller(&self, id: &ShortId) -> Result<()> {
        let provisioner = WorkloadProvisioner::new(&self.session);
        let Some(workload) = provisioner.lookup_workload(id)? else {
            tracing::debug!(%id, "no workload, already torn down");
            return Ok(());
        };

        // an empty back-reference list means the interfaces are already gone
        for entry in &workload.interface_back_refs {
            self.forwarding.unregister(&entry.uuid)?;
        }
        self.netns.clear_interfaces(id)?;
        for entry in &workload.interface_back_refs {
            provisioner.delete_interface(&entry.uuid)?;
        }
        provisioner.delete_workload(&workload)
    }
}
