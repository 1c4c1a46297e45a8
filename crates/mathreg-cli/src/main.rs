use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod script;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config.log_level);
    commands::run_command(cli, config)
}

fn init_tracing(verbose: bool, configured: &str) {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::WARN)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
