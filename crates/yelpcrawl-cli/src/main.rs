use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod crawl;

#[derive(Debug, Parser)]
#[command(name = "yelpcrawl")]
#[command(about = "Crawl business listings for a category and location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every results page and write one JSON record per business
    Crawl {
        /// Business category, e.g. "pizza" (overrides the parameters file)
        #[arg(long, requires = "location")]
        category: Option<String>,
        /// Search location, e.g. "San Francisco, CA" (overrides the parameters file)
        #[arg(long, requires = "category")]
        location: Option<String>,
        /// JSON parameters file; defaults to `YELPCRAWL_PARAMS_PATH`
        #[arg(long)]
        params: Option<PathBuf>,
        /// Write records here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the seed URL and client identity without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = yelpcrawl_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Crawl {
            category,
            location,
            params,
            output,
            dry_run,
        } => {
            let args = crawl::CrawlArgs {
                category,
                location,
                params,
                output,
                dry_run,
            };
            crawl::run_crawl(&config, args).await?;
        }
    }

    Ok(())
}
