//! Config commands for inspecting and creating CLI defaults.

use crate::config::{CliConfig, ConfigLoader};
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration file paths
    Path,
    /// Write a config file with default values
    Init {
        /// Write the user config instead of the project config
        #[arg(long)]
        user: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
        ConfigCommands::Init { user, force } => init_config(user, force),
    }
}

fn show_config() -> Result<()> {
    let config = ConfigLoader::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths() -> Result<()> {
    let user = ConfigLoader::user_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string());
    println!("User config:    {}", user);
    println!(
        "Project config: {}",
        ConfigLoader::project_config_path().display()
    );
    Ok(())
}

fn init_config(user: bool, force: bool) -> Result<()> {
    let path = if user {
        ConfigLoader::user_config_path().context("could not determine user config path")?
    } else {
        ConfigLoader::project_config_path()
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    ConfigLoader::save_to_path(&CliConfig::default(), &path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
