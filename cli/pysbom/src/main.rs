//! pysbom: inventory of the packages installed in a Python environment.

mod commands;
mod config;
mod pip;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{Overrides, PysbomConfig, Settings};

#[derive(Parser)]
#[command(name = "pysbom", version, about = "Python environment SBOM inventory")]
struct Cli {
    /// Project directory (default: current directory)
    #[arg(long, global = true)]
    path: Option<PathBuf>,
    /// Name of the project's own package
    #[arg(long, global = true)]
    root: Option<String>,
    /// pip invocation (e.g. "pip", "python3 -m pip")
    #[arg(long, global = true)]
    pip: Option<String>,
    /// Per-package metadata fetch timeout in seconds (0 disables)
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Maximum concurrent metadata fetches
    #[arg(long, global = true)]
    jobs: Option<usize>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print resolved modules with their dependencies as JSON
    Modules {
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the dependency tree of the root package
    Tree,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Modules { compact } => commands::modules::run(&settings, compact).await,
        Commands::Tree => commands::tree::run(&settings).await,
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let project_dir = match &cli.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    let config = PysbomConfig::find_and_load(&project_dir)?
        .map(|(config, _)| config)
        .unwrap_or_default();

    Settings::resolve(
        project_dir,
        config,
        Overrides {
            root: cli.root.clone(),
            pip: cli.pip.clone(),
            timeout_secs: cli.timeout,
            jobs: cli.jobs,
        },
    )
}
