//! SDN controller access for the weft workspace.
//!
//! The controller holds the authoritative resource graph (compute nodes,
//! projects, networks, workloads, interfaces). This crate provides the API
//! session seam, the wire-level resource model, and the two provisioning
//! components built on top of it:
//!
//! - [`locator::ResourceLocator`] — locate-or-create access to the shared
//!   resources (compute node, project, network).
//! - [`provisioner::WorkloadProvisioner`] — lifetime management of the
//!   per-container workload and interface resources.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod locator;
pub mod provisioner;
pub mod resources;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
