use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lilium_core::cli::config::{self, ConfigCmd};
use lilium_core::conf::load_config;
use lilium_core::logging::init_logging;
use lilium_core::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lilium",
    version,
    about = "Lilium: rewriting reverse proxy built on Pingora"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },

    /// Run the proxy (default)
    Run {
        /// Path to the config directory
        #[arg(long, default_value = "config")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => config::run(cmd),

        Some(Command::Run { config }) => run(config),

        None => run(PathBuf::from("config")),
    }
}

fn run(config_dir: PathBuf) -> Result<()> {
    init_logging();

    let cfg = load_config(&config_dir)
        .with_context(|| format!("failed to load config from {}", config_dir.display()))?;

    server::run(cfg)
}
