use crate::conf::{ConfigError, LiliumConfig, load_config};
use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config directory
        #[arg(default_value = "config")]
        path: PathBuf,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = "config")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Check { path } => check(path),
        ConfigCmd::Dump { path, yaml, .. } => dump(path, yaml),
    }
}

pub fn check(path: PathBuf) -> Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            print_summary(&cfg);
            Ok(())
        }
        Err(err) => {
            print_config_error(&err);
            std::process::exit(1);
        }
    }
}

fn print_summary(cfg: &LiliumConfig) {
    let ok = "✔".green();

    println!("{ok} Config loaded successfully");
    println!("{ok} listening on {}", cfg.server.listen);
    println!(
        "{ok} tls {}",
        if cfg.server.tls.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("{ok} rewritten links use {}://", cfg.server.default_scheme());
    println!(
        "{ok} insecure upstreams {}",
        if cfg.upstream.upgrade_insecure {
            "upgraded to https"
        } else {
            "fetched as written"
        }
    );
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{} {err}", "✘".red());
    if let Some(hint) = err.hint() {
        eprintln!();
        eprintln!("{}", hint.dimmed());
    }
}

/// Print the loaded config; JSON unless `yaml` is set.
pub fn dump(path: PathBuf, yaml: bool) -> Result<()> {
    let cfg = load_config(&path)?;

    if yaml {
        dump_yaml(&cfg)?;
    } else {
        dump_json(&cfg)?;
    }

    Ok(())
}

fn dump_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
