//! etcdadm-cloudinit - render etcd bootstrap cloud-config documents
//!
//! Reads an init or join input file and writes the resulting
//! cloud-config to stdout or to `--output`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use etcdadm_cloudinit::config::loader::{load_init_input, load_join_input};
use etcdadm_cloudinit::{new_init, new_join};

#[derive(Parser)]
#[command(name = "etcdadm-cloudinit")]
#[command(author, version, about = "Render cloud-config documents that bootstrap etcd members", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document that starts a new etcd cluster
    Init {
        /// Init input file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a document that joins an existing etcd cluster
    Join {
        /// Join input file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Client URL of an existing member, overrides the input file
        #[arg(long, env = "ETCDADM_JOIN_ADDRESS")]
        join_address: Option<String>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

async fn write_document(document: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, document)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", document.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(document).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { config, output } => {
            info!("Rendering init document from {}", config.display());
            let input = load_init_input(&config)
                .await
                .with_context(|| format!("failed to load {}", config.display()))?;
            let document = new_init(input).context("failed to render init document")?;
            write_document(&document, output.as_deref()).await?;
        }
        Commands::Join {
            config,
            join_address,
            output,
        } => {
            info!("Rendering join document from {}", config.display());
            let mut input = load_join_input(&config)
                .await
                .with_context(|| format!("failed to load {}", config.display()))?;
            if let Some(address) = join_address {
                input.join_address = address;
            }
            let document = new_join(input).context("failed to render join document")?;
            write_document(&document, output.as_deref()).await?;
        }
    }

    Ok(())
}
