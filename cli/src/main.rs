use clap::Parser;

mod commands;

use commands::eft::EftCommands;

#[derive(Parser)]
#[command(name = "eft-cli")]
#[command(about = "CLI for EFT tiled texture files", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: EftCommands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    commands::eft::handle(cli.command)
}
