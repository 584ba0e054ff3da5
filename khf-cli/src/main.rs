//! KHF CLI - dashboard server and tools for Kenya health facility data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "khf-cli",
    version,
    about = "Kenya health facilities dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: khf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    khf_cmd::run(cli.command).await
}
