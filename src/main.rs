mod cli;
mod config;
mod control;
mod ecs;
mod lister;
mod model;
mod resolver;
mod selector;
mod session;
mod transport;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use config::Settings;
use ecs::EcsGateway;
use selector::Selector;
use std::io;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use transport::TransportInvocation;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter)?;

    let settings = Settings::from_args(&args)?;
    let gateway = EcsGateway::new(&settings.region, &settings.profile).await;

    run(&gateway, &settings).await
}

fn init_tracing(level_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();

    Ok(())
}

async fn run(gateway: &EcsGateway, settings: &Settings) -> Result<()> {
    let resolved = {
        let mut selector = Selector::new(io::stdin().lock(), io::stdout());
        resolver::resolve(gateway, &mut selector).await?
    };
    debug!(service = %resolved.service, "resolved through service");

    let (session, target) = session::negotiate(
        gateway,
        &mut io::stdout(),
        &resolved.cluster,
        &resolved.task,
        &resolved.container,
        &settings.shell,
    )
    .await?;
    info!(%target, "session negotiated");

    let invocation = TransportInvocation::new(settings, &session, &target)?;

    let status = invocation.launch().await?;
    debug!(%status, "interactive session finished");
    Ok(())
}
