use anyhow::Result;
use clap::Parser;
use tracing::info;

use sim::{load_config, run, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    args.apply(&mut cfg);
    info!(?cfg, "Sim config loaded");

    let summary = run(&cfg)?;
    info!(?summary, "Run complete");
    Ok(())
}
