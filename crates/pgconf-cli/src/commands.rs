use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pgconf-cli")]
#[command(
    about = "Boot or reload a configuration file against a demonstration registry",
    long_about = None,
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Overrides the `PGCONF_LOG` env var for this run.
    #[arg(long, global = true)]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "boot", about = "Run a boot-context reload against a fresh registry")]
    Boot(ReloadArgs),
    #[command(name = "reload", about = "Run a reload-context pass against a fresh registry")]
    Reload(ReloadArgs),
}

#[derive(Debug, Parser)]
pub struct ReloadArgs {
    /// Configuration file to load.
    pub config_file: PathBuf,
}
