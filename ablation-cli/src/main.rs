use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod components;
mod config;

#[derive(Parser)]
#[command(
    name = "ablation",
    about = "Plan ablation studies and rank component importance"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the baseline and ablation runs for a component inventory
    Configure(commands::configure::ConfigureArgs),
    /// Compute component importance from populated runs
    Analyze(commands::analyze::AnalyzeArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Configure(args) => commands::configure::run(args, &config::ConfigLoader::load()?),
        Commands::Analyze(args) => commands::analyze::run(args, &config::ConfigLoader::load()?),
        Commands::Config(args) => commands::config::run(args),
    }
}
