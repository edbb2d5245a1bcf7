//! Attach/detach orchestration for the weft plugin.
//!
//! Sequences the controller provisioning, namespace wiring, and forwarding
//! registration components into the composite `init`, `setup`, and
//! `teardown` operations invoked at container-lifecycle events.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod orchestrator;
pub mod runtime;
