//! Ceremony host
//!
//! Drives one scripted ceremony with real timers, a mock wallet and a logging
//! explorer, printing every published view as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use stellaris_app::{
    CeremonyConfig, CeremonyContext, CeremonyHandle, CeremonyRuntime, CeremonyStage, CeremonyView,
};
use stellaris_core::{StellarisConfig, TokenId};
use stellaris_effects::{MockWalletHandler, TracingExplorerHandler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ceremony-host")]
#[command(about = "Run a scripted Stellaris swap ceremony", long_about = None)]
struct Cli {
    /// Config file path (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Token to give
    #[arg(long, default_value = "BTC")]
    give: String,

    /// Token to receive
    #[arg(long, default_value = "APT")]
    receive: String,

    /// Open the explorer link once complete
    #[arg(long)]
    explorer: bool,

    /// Seconds to wait for each stage before giving up
    #[arg(long, default_value = "30")]
    stage_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = CeremonyConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let ctx = Arc::new(CeremonyContext::from_config(&config)?);

    let give = TokenId::from(cli.give.as_str());
    let receive = TokenId::from(cli.receive.as_str());
    for token in [&give, &receive] {
        if !ctx.catalog().contains(token) {
            bail!("unknown token {token}");
        }
    }
    if give == receive {
        bail!("cannot give and receive the same token ({give})");
    }

    let (runtime, handle) = CeremonyRuntime::new(
        ctx,
        MockWalletHandler::default(),
        TracingExplorerHandler::new(),
    );
    let runtime = tokio::spawn(runtime.run());
    let printer = tokio::spawn(print_views(handle.clone()));
    let timeout = Duration::from_secs(cli.stage_timeout);

    handle.connect_wallet()?;
    wait_for_stage(&handle, CeremonyStage::AwaitingGiveChoice, timeout).await?;

    handle.pick_give(give)?;
    wait_for_stage(&handle, CeremonyStage::AwaitingReceiveChoice, timeout).await?;

    handle.pick_receive(receive)?;
    let view = wait_for_stage(&handle, CeremonyStage::Complete, timeout).await?;
    if let Some(summary) = &view.summary {
        tracing::info!(ceremony = view.ceremony, "{}", summary.headline());
    }

    if cli.explorer {
        handle.view_on_explorer()?;
    }

    handle.shutdown()?;
    runtime.await??;
    printer.await?;
    Ok(())
}

async fn wait_for_stage(
    handle: &CeremonyHandle,
    stage: CeremonyStage,
    timeout: Duration,
) -> Result<CeremonyView> {
    match tokio::time::timeout(timeout, handle.wait_for(|v| v.stage == stage)).await {
        Ok(Some(view)) => Ok(view),
        Ok(None) => bail!("runtime stopped before reaching {stage:?}"),
        Err(_) => bail!("timed out waiting for {stage:?}"),
    }
}

async fn print_views(handle: CeremonyHandle) {
    let mut sub = handle.subscribe();
    print_view(&sub.get());
    while let Some(view) = handle.changed(&mut sub).await {
        print_view(&view);
    }
}

fn print_view(view: &CeremonyView) {
    match serde_json::to_string(view) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::warn!(error = %err, "failed to encode view"),
    }
}
