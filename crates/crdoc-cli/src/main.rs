//! crdoc CLI - browse versioned CRD documentation across product releases

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;
mod site;

use error::Result;
use site::SiteArgs;

#[derive(Parser)]
#[command(name = "crdoc")]
#[command(author = "crdoc Contributors")]
#[command(version)]
#[command(about = "Browse versioned CRD documentation across product releases", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    site: SiteArgs,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a resource version with its spec and status fields
    Show {
        /// Full resource name (e.g., interfaces.interfaces.eda.nokia.com)
        name: String,

        /// Version (defaults to the first declared version)
        #[arg(id = "resource_version", value_name = "VERSION")]
        version: Option<String>,

        /// Release to read from (defaults to the default release)
        #[arg(short, long)]
        release: Option<String>,

        /// Output the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a page path (e.g., /<name>/<version>?release=<release>)
    Route {
        /// Path with optional query string
        path: String,
    },

    /// Print the oldest release deprecating a resource version
    DeprecatedSince {
        /// Full resource name
        name: String,

        /// Version
        #[arg(id = "resource_version", value_name = "VERSION")]
        version: String,

        /// Release whose manifest is already current
        #[arg(short, long)]
        release: Option<String>,
    },

    /// List configured releases
    Releases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resource catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Merge catalog files (later files win) into one
    Merge {
        /// Catalog files, oldest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (if not set, writes to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Log to stderr: `CRDOC_LOG` when set, else warnings (debug with `--debug`)
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CRDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show {
            name,
            version,
            release,
            json,
        } => {
            let loader = cli.site.page_loader()?;
            commands::show::run(&loader, &name, version.as_deref(), release.as_deref(), json).await
        }

        Commands::Route { path } => {
            let loader = cli.site.page_loader()?;
            commands::route::run(&loader, &path).await
        }

        Commands::DeprecatedSince {
            name,
            version,
            release,
        } => commands::deprecated_since::run(&cli.site, &name, &version, release.as_deref()).await,

        Commands::Releases { json } => commands::releases::run(&cli.site, json),

        Commands::Catalog { command } => match command {
            CatalogCommands::Merge { files, output } => {
                commands::catalog::merge(&files, output.as_deref())
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code as u8)
        }
    }
}
