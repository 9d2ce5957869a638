//! Rain CLI - period totals, trailing comparisons, year progress and dry
//! spells from a daily rainfall dataset.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "rain-cli",
    version,
    about = "Daily rainfall aggregation and comparison toolkit"
)]
struct Cli {
    #[command(flatten)]
    options: rain_cmd::GlobalOptions,

    #[command(subcommand)]
    command: rain_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[rain] cli: parsed {:?}", cli.command);
    rain_cmd::run(cli.options, cli.command).await
}
