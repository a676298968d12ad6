//! gha-docs - render README docs from a GitHub Action manifest

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gha_docs::cli::{self, Cli};

fn main() -> Result<()> {
    // Logs go to stderr so --dry-run output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gha_docs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = args.load_config()?;
    tracing::debug!("Configuration: {:?}", config);

    let stdout = std::io::stdout();
    cli::run(&config, &mut stdout.lock())
}
