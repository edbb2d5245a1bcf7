//! CLI command definitions and dispatch.

pub mod init;
pub mod setup;
pub mod teardown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use weft_common::config::WeftConfig;
use weft_controller::session::HttpSession;
use weft_net::forwarding::AgentClient;
use weft_net::netns::NetnsManager;
use weft_plugin::orchestrator::Orchestrator;
use weft_plugin::runtime::Docker;

/// weft — attaches container namespaces to the overlay network.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register this host as a compute node on the overlay.
    Init(init::InitArgs),
    /// Attach a container to the overlay network.
    Setup(setup::SetupArgs),
    /// Detach a container from the overlay network.
    Teardown(teardown::TeardownArgs),
}

/// The production orchestrator wired to the real collaborators.
pub type PluginOrchestrator = Orchestrator<HttpSession, NetnsManager, AgentClient, Docker>;

/// Builds the orchestrator for one invocation from explicit configuration.
pub(crate) fn build(config: WeftConfig) -> PluginOrchestrator {
    let session = HttpSession::new(&config.api_endpoint);
    let netns = NetnsManager::new(config.netns_dir.clone());
    let agent = AgentClient::new(&config.agent_endpoint);
    Orchestrator::new(session, netns, agent, Docker, config)
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if loading configuration or executing the command
/// fails; the process exits nonzero with a logged diagnostic.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config {
        Some(path) => WeftConfig::load(&path)?,
        None => WeftConfig::default(),
    };
    match cli.command {
        Command::Init(args) => init::execute(&args, config),
        Command::Setup(args) => setup::execute(&args, config),
        Command::Teardown(args) => teardown::execute(&args, config),
    }
}
