//! Command implementations for the Kenya health facilities CLI.
//!
//! Provides subcommands to serve the interactive dashboard, render a static
//! dashboard page, export a filtered view to CSV and list selection domains.

use clap::Subcommand;
use std::path::PathBuf;

pub mod config;
pub mod export;
pub mod options;
pub mod server;

use config::{DashboardConfig, DatasetArgs, SelectionArgs};

#[derive(Subcommand)]
pub enum Command {
    /// Serve the interactive dashboard over HTTP
    Serve {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Address to listen on
        #[arg(short = 'l', long, default_value = config::DEFAULT_LISTEN)]
        listen: String,

        /// Seconds a loaded dataset is reused before it is read again
        #[arg(long, default_value_t = config::DEFAULT_CACHE_TTL_SECS)]
        cache_ttl_secs: u64,
    },

    /// Render a static dashboard page and the CSV export it links to
    Render {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output path for the HTML page
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Export the filtered facilities to CSV
    Export {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output path (default: facilities_<county>_<constituency>.csv)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the county, constituency and facility type domains as JSON
    Options {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Restrict constituencies to this county
        #[arg(short = 'c', long)]
        county: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve {
            dataset,
            listen,
            cache_ttl_secs,
        } => {
            let config = DashboardConfig::new(&dataset, &listen, cache_ttl_secs)?;
            server::serve(config).await
        }
        Command::Render {
            dataset,
            selection,
            output,
        } => {
            export::run_render(&dataset, &selection, &output).await?;
            Ok(())
        }
        Command::Export {
            dataset,
            selection,
            output,
        } => {
            export::run_export(&dataset, &selection, output).await?;
            Ok(())
        }
        Command::Options { dataset, county } => options::run_options(&dataset, county).await,
    }
}
