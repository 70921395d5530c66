use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use meridian_catalog::catalog::LocationCatalog;
use meridian_session::session_params::SessionParams;
use mimalloc::MiMalloc;
use tracing::debug;

use crate::{route::RouteArgs, search::SearchArgs};

mod parsers;
mod route;
mod search;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with the locations to use instead of the built-in ones
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the locations whose name or address contains a query
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Estimate a route between the best matches of two queries
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
}

fn load_catalog(path: Option<&Path>) -> Result<LocationCatalog, anyhow::Error> {
    match path {
        Some(path) => {
            let catalog = LocationCatalog::from_json_file(path)?;
            debug!("Loaded {} locations from {:?}", catalog.locations().len(), path);
            Ok(catalog)
        }
        None => Ok(LocationCatalog::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let params = SessionParams::from_env()?;
    let catalog = load_catalog(cli.catalog.as_deref())?.with_latency(params.search_latency);

    match cli.command {
        Commands::Search { args } => search::run(args, catalog).await?,
        Commands::Route { args } => route::run(args, catalog, params).await?,
    }

    Ok(())
}
