use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netforge::render::{load_document, load_template, render};

/// Render a network config from a device document and a template
#[derive(Parser)]
#[command(name = "render", version)]
struct Args {
    /// Path to the device document (YAML)
    #[arg(long)]
    document: PathBuf,

    /// Path to the template file
    #[arg(long)]
    template: PathBuf,

    /// Optional output file; defaults to standard output
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays clean for the
    // rendered config.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let document = load_document(&args.document)?;
    let template = load_template(&args.template)?;
    let config = render(&document, &template)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &config)
                .with_context(|| format!("failed to write output file {}", path.display()))?;
            println!("Configuration rendered to {}", path.display());
        }
        None => println!("{}", config),
    }

    Ok(())
}
