//! OS-side networking for the weft plugin.
//!
//! Covers everything that touches this host rather than the controller:
//! the named network-namespace link directory, veth pair wiring into a
//! container's namespace, dataplane forwarding registration against the
//! local agent, and detection of this node's hostname and overlay address.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod command;
pub mod forwarding;
pub mod local;
pub mod netns;
