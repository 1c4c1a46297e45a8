use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mathreg",
    about = "Named, reference-counted scalars, vectors, and matrices",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML session config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute a script of binding commands
    Run(RunArgs),
    /// Create, bind, inspect, and unbind a few objects
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Script path, or `-` for stdin
    pub script: String,
}

#[derive(Args)]
pub struct DemoArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_globals() {
        let cli = Cli::try_parse_from([
            "mathreg", "--format", "json", "-v", "run", "script.txt",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Run(args) => assert_eq!(args.script, "script.txt"),
            Command::Demo(_) => panic!("expected run"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["mathreg", "demo", "--config", "s.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("s.toml")));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
