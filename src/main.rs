//! CLI entry point for counsel-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "counsel-site")]
#[command(version)]
#[command(about = "A law firm website rendered from CMS content blocks", long_about = None)]
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
    /// Serve pages live from the content store
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Render one path to stdout
    Render {
        /// URL path, e.g. /about/
        path: String,

        /// Show diagnostics for blocks that cannot be drawn
        #[arg(long)]
        preview: bool,
    },

    /// Export the site as static files
    #[command(alias = "g")]
    Generate,

    /// Remove the public folder
    Clean,

    /// Check a content JSON file against the block schema
    Validate {
        /// Page row, `{content}` object or block list
        file: PathBuf,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "counsel_site=debug,info"
    } else {
        "counsel_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = counsel_site::Site::new(&base_dir)?;
            counsel_site::commands::serve::run(site, ip, port).await?;
        }

        Commands::Render { path, preview } => {
            let site = counsel_site::Site::new(&base_dir)?;
            let html = counsel_site::commands::render::run(&site, &path, preview).await?;
            println!("{}", html);
        }

        Commands::Generate => {
            let site = counsel_site::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            let report = site.generate().await?;
            println!("Generated {} pages successfully!", report.pages.len());
        }

        Commands::Clean => {
            let site = counsel_site::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Validate { file } => {
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            let reports = counsel_site::commands::validate::run(&file)?;
            println!("{} blocks checked", reports.len());
        }

        Commands::Version => {
            println!("counsel-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
