//! CLI entry point for mdwiki

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdwiki")]
#[command(version)]
#[command(about = "A small Markdown wiki backed by flat files", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the wiki server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List saved pages
    List,

    /// Create a new page
    New {
        /// Title of the new page
        title: String,

        /// Markdown file to use as the page source
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdwiki=debug,tower_http=debug,info"
    } else {
        "mdwiki=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let wiki = mdwiki::Wiki::new(&base_dir)?;
            tracing::info!("Starting wiki at http://{}:{}", ip, port);
            mdwiki::server::start(&wiki, &ip, port).await?;
        }

        Commands::List => {
            let wiki = mdwiki::Wiki::new(&base_dir)?;
            wiki.list()?;
        }

        Commands::New { title, file } => {
            let wiki = mdwiki::Wiki::new(&base_dir)?;
            tracing::info!("Creating page: {}", title);
            wiki.new_page(&title, file.as_deref())?;
        }

        Commands::Version => {
            println!("mdwiki version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
