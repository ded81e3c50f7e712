use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::thread::sleep;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netforge::config::{Config, Inventory};
use netforge::retrieve::{RetrievalError, RunningConfigSource, SshSource};
use netforge::store::GoldenStore;

/// Capture and browse golden configs (archived running configurations)
#[derive(Parser)]
#[command(name = "golden", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the running config from a device and archive it
    Fetch {
        /// Device name from the inventory (case-insensitive)
        device: String,
    },
    /// List archived captures, most recent first
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::load();
    let archive = GoldenStore::new(&config.golden_dir);

    match args.command {
        Command::Fetch { device } => fetch(&config, &archive, &device),
        Command::List => list(&archive),
    }
}

fn fetch(config: &Config, archive: &GoldenStore, device: &str) -> Result<()> {
    let inventory = Inventory::load(&config.inventory_path)?;
    let device = device.to_uppercase();
    let Some(host) = inventory.address(&device) else {
        bail!(
            "unknown device: {} (known: {})",
            device,
            inventory.names().join(", ")
        );
    };

    let source = SshSource::new(
        &config.ssh_user,
        &config.ssh_pass,
        config.ssh_timeout_secs,
        &config.capture_command,
    );

    tracing::info!("Fetching running config from {} ({})", device, host);

    match fetch_with_retry(&source, &device, host) {
        Ok(output) => {
            let path = archive.save(&device, &output)?;
            println!("Saved golden config for {} to {}", device, path.display());
            Ok(())
        }
        Err(RetrievalError::Timeout(err)) => {
            bail!("Connection timed out to {} ({}): {}", device, host, err)
        }
        Err(RetrievalError::Auth(err)) => {
            bail!("Authentication failed for {} ({}): {}", device, host, err)
        }
        Err(err) => bail!("Error fetching config from {} ({}): {}", device, host, err),
    }
}

/// Retry transient failures up to three times with backoff. Authentication
/// failures are final: credentials will not improve on retry.
fn fetch_with_retry(
    source: &SshSource,
    device: &str,
    host: &str,
) -> Result<String, RetrievalError> {
    let mut attempt: u64 = 1;
    loop {
        match source.fetch_running_config(host) {
            Ok(output) => return Ok(output),
            Err(err @ RetrievalError::Auth(_)) => return Err(err),
            Err(err) if attempt >= 3 => return Err(err),
            Err(err) => {
                tracing::warn!("Attempt {} failed for {} ({}): {}", attempt, device, host, err);
                sleep(Duration::from_secs(attempt * 5));
                attempt += 1;
            }
        }
    }
}

fn list(archive: &GoldenStore) -> Result<()> {
    let files = archive.list()?;
    if files.is_empty() {
        println!("No golden configs archived yet");
        return Ok(());
    }
    for file in files {
        println!("{}", file);
    }
    Ok(())
}
