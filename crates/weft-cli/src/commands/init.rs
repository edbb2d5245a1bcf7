//! `weft init` — register this host as a compute node.

use clap::Args;

use weft_common::config::WeftConfig;

/// Arguments for the `init` command.
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Executes the `init` command.
///
/// Detects the hostname and the overlay-facing address, then ensures the
/// compute node resource exists on the controller.
///
/// # Errors
///
/// Returns an error if local detection or registration fails.
pub fn execute(_args: &InitArgs, config: WeftConfig) -> anyhow::Result<()> {
    let hostname = weft_net::local::hostname()?;
    let local_ip = weft_net::local::overlay_address(&config.overlay_device)?;

    let orchestrator = super::build(config);
    let node = orchestrator.init(&hostname, local_ip)?;
    tracing::info!(hostname, %local_ip, fqn = %node.fq_name, "compute node registered");
    Ok(())
}
