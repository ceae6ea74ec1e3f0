//! Pulse agent entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;

use pulse_common::init_tracing;

use pulse_agent::agent::Agent;
use pulse_agent::args::AgentArgs;
use pulse_agent::config::AgentConfig;
use pulse_agent::identity::IdentityStore;
use pulse_agent::platform::HostPlatform;
use pulse_agent::reporter::Reporter;
use pulse_agent::sampler::Sampler;

#[tokio::main]
async fn main() -> Result<()> {
    let args = AgentArgs::parse();

    let config = AgentConfig::load_from_file(&args.config)
        .with_context(|| format!("failed to load config '{}'", args.config.display()))?;

    init_tracing(&args.logging(&config.logging)).map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pulse agent");

    let endpoint = config
        .reporter
        .endpoint_url()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let identity = IdentityStore::new(
        config
            .identity
            .path
            .clone()
            .unwrap_or_else(IdentityStore::default_path),
    );
    let device_id = identity
        .load_or_create()
        .context("failed to load device identity")?;

    let sampler = Sampler::new(HostPlatform::new(), device_id);
    let reporter = Reporter::new(endpoint);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut agent_task = tokio::spawn(Agent::new(sampler, reporter, shutdown_rx).run());

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
            let _ = shutdown_tx.send(true);
            let _ = agent_task.await;
        }
        // The agent stops on its own when the capability gate is denied.
        _ = &mut agent_task => {}
    }

    tracing::info!("goodbye");
    Ok(())
}
