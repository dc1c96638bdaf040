//! Hubroute - query and edit a hub route network.
//!
//! Commands:
//! - `hubroute hubs` - List hubs
//! - `hubroute routes` - List stored routes
//! - `hubroute direct` - Show the stored route between two hubs
//! - `hubroute shortest` - Find the shortest route between two hubs
//! - `hubroute add` / `update` / `remove` - Edit routes

mod commands;
mod config;
mod context;
mod network;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, PairArgs, RemoveArgs, UpdateArgs};
use context::{Context, LoadedConfig};

/// Hubroute - query and edit a hub route network
#[derive(Parser)]
#[command(name = "hubroute")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hubs
    Hubs,

    /// List stored routes
    Routes,

    /// Show the stored route between two hubs
    Direct(PairArgs),

    /// Find the shortest route between two hubs
    Shortest(PairArgs),

    /// Add a route
    Add(AddArgs),

    /// Change a route's distance and time
    Update(UpdateArgs),

    /// Remove a route
    Remove(RemoveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = output::Output::new(cli.json);

    let result = run(cli, output.clone()).await;

    if let Err(e) = result {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli, output: output::Output) -> Result<()> {
    let loaded = LoadedConfig::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &loaded.config.log.level);

    let ctx = Context::open(loaded, output).await?;

    match cli.command {
        Commands::Hubs => commands::hubs::run(&ctx).await,
        Commands::Routes => commands::routes::run(&ctx).await,
        Commands::Direct(args) => commands::query::direct(args, &ctx).await,
        Commands::Shortest(args) => commands::query::shortest(args, &ctx).await,
        Commands::Add(args) => commands::edit::add(args, &ctx).await,
        Commands::Update(args) => commands::edit::update(args, &ctx).await,
        Commands::Remove(args) => commands::edit::remove(args, &ctx).await,
    }
}

/// Filter installed by `--verbose`.
const VERBOSE_FILTER: &str = "hub_route=debug,hubroute=debug,info";

/// Initialize logging to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(verbose: bool, level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
