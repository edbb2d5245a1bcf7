//! `weft teardown` — detach a container from the overlay network.

use clap::Args;

use weft_common::config::WeftConfig;
use weft_common::types::{ContainerId, PodRef};
use weft_net::netns::NetnsManager;

/// Arguments for the `teardown` command.
#[derive(Args, Debug)]
pub struct TeardownArgs {
    /// Pod namespace, mapped 1:1 to a project.
    pub pod_namespace: String,
    /// Pod name.
    pub pod_name: String,
    /// Full container identifier from the runtime.
    pub container_id: String,
}

/// Executes the `teardown` command.
///
/// A container that was never attached, or is already detached, tears down
/// cleanly as a no-op.
///
/// # Errors
///
/// Returns an error if the controller-side unwind or namespace removal
/// fails.
pub fn execute(args: &TeardownArgs, config: WeftConfig) -> anyhow::Result<()> {
    NetnsManager::verify_tools()?;
    let pod = PodRef::new(&args.pod_namespace, &args.pod_name);
    let container = ContainerId::new(&args.container_id);

    let orchestrator = super::build(config);
    orchestrator.teardown(&pod, &container)?;
    Ok(())
}
