//! Lifetime management of per-container controller resources.
//!
//! The workload and its interface follow the same locate-or-create pattern
//! as the shared resources, but are scoped under the workload's identity
//! rather than a fixed domain path. Deletion happens at teardown, interface
//! before workload.

use std::net::Ipv4Addr;

use weft_common::error::{Result, WeftError};
use weft_common::types::ShortId;

use crate::resources::{Interface, Resource, VirtualNetwork, Workload};
use crate::session::{ControllerApi, Lookup};

/// Provisioning of the workload and interface resources for one container.
///
/// Borrows an established API session; holds no other state.
#[derive(Debug)]
pub struct WorkloadProvisioner<'a, S> {
    session: &'a S,
}

impl<'a, S: ControllerApi> WorkloadProvisioner<'a, S> {
    /// Creates a provisioner over the given session.
    #[must_use]
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// Ensures the workload for a container exists.
    ///
    /// # Errors
    ///
    /// Propagates controller failures verbatim.
    pub fn locate_workload(&self, id: &ShortId) -> Result<Workload> {
        match self.session.read(&Workload::fqn(id))? {
            Lookup::Found(workload) => Ok(workload),
            Lookup::Missing => {
                tracing::debug!(%id, "creating workload");
                self.session.create(&Workload::new(id))
            }
        }
    }

    /// Reads the workload for a container without creating it.
    ///
    /// Used by teardown: an already-removed workload is an ordinary `None`,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Propagates controller failures other than "not found".
    pub fn lookup_workload(&self, id: &ShortId) -> Result<Option<Workload>> {
        Ok(self.session.read(&Workload::fqn(id))?.found())
    }

    /// Ensures the workload's interface on the given network exists.
    ///
    /// The controller assigns an address out of the network's subnet when
    /// the interface is first created.
    ///
    /// # Errors
    ///
    /// Propagates controller failures verbatim.
    pub fn locate_interface(
        &self,
        workload: &Workload,
        network: &VirtualNetwork,
        name: &str,
    ) -> Result<Interface> {
        match self.session.read(&workload.fq_name.child(name))? {
            Lookup::Found(iface) => Ok(iface),
            Lookup::Missing => {
                tracing::debug!(workload = %workload.fq_name, iface = name, "creating interface");
                self.session.create(&Interface::new(workload, network, name))
            }
        }
    }

    /// Resolves the controller-assigned address of an interface.
    ///
    /// Re-reads the interface and selects the first allocated address; the
    /// snapshot is not assumed to stay consistent across later mutations.
    ///
    /// # Errors
    ///
    /// Fails if the interface has vanished or holds no allocated address.
    pub fn resolve_address(&self, iface: &Interface) -> Result<(Ipv4Addr, u8)> {
        let uuid = iface.require_uuid()?;
        let snapshot = match self.session.read_by_uuid::<Interface>(uuid)? {
            Lookup::Found(snapshot) => snapshot,
            Lookup::Missing => {
                return Err(WeftError::NotFound {
                    kind: Interface::KIND,
                    id: uuid.to_string(),
                });
            }
        };
        let address = snapshot.addresses.first().ok_or_else(|| WeftError::NotFound {
            kind: "allocated address",
            id: snapshot.fq_name.to_string(),
        })?;
        Ok((address.ip, address.prefix_len))
    }

    /// Deletes an interface by UUID. Deleting an absent interface succeeds.
    ///
    /// # Errors
    ///
    /// Propagates controller failures other than "not found".
    pub fn delete_interface(&self, uuid: &str) -> Result<()> {
        self.session.delete::<Interface>(uuid)
    }

    /// Deletes a workload. All of its interfaces must be deleted first.
    ///
    /// # Errors
    ///
    /// Propagates controller failures other than "not found".
    pub fn delete_workload(&self, workload: &Workload) -> Result<()> {
        self.session.delete::<Workload>(workload.require_uuid()?)
    }
}
