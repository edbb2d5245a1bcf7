//! # weft — pod overlay-network plugin
//!
//! Invoked at container-lifecycle events to attach and detach a container's
//! network namespace to and from the SDN-managed overlay network.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
