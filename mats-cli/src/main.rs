//! MATS CLI - Command line tool for reliability plot data and curve metadata.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "mats-cli",
    version,
    about = "MATS verification plot data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: mats_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[MATS] cli: starting");
    mats_cmd::run(cli.command)
}
