//! `weft setup` — attach a container to the overlay network.

use clap::Args;

use weft_common::config::WeftConfig;
use weft_common::types::{ContainerId, PodRef};
use weft_net::netns::NetnsManager;

/// Arguments for the `setup` command.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Pod namespace, mapped 1:1 to a project.
    pub pod_namespace: String,
    /// Pod name.
    pub pod_name: String,
    /// Full container identifier from the runtime.
    pub container_id: String,
}

/// Executes the `setup` command.
///
/// # Errors
///
/// Returns an error if any attach step fails; prior steps are left in
/// place for a re-invocation to resume from.
pub fn execute(args: &SetupArgs, config: WeftConfig) -> anyhow::Result<()> {
    NetnsManager::verify_tools()?;
    let pod = PodRef::new(&args.pod_namespace, &args.pod_name);
    let container = ContainerId::new(&args.container_id);

    let orchestrator = super::build(config);
    orchestrator.setup(&pod, &container)?;
    Ok(())
}
