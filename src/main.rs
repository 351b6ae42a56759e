//! imgprep CLI - Batch Image Preprocessing
//!
//! Command-line interface for the imgprep pipeline.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::info;

use imgprep::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("imgprep v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Run {
            source,
            sequential,
            skip_existing,
            summary_json,
        } => {
            let summary = commands::run(&source, sequential, skip_existing, summary_json.as_deref())
                .context("pipeline run failed")?;
            if !summary.is_clean() {
                info!("{} files failed; see warnings above", summary.failed());
            }
            Ok(())
        }
        Commands::Plan { source } => commands::plan(&source).context("planning failed"),
        Commands::InitConfig { path, source, dest } => {
            commands::init_config(&path, &source, &dest)
                .with_context(|| format!("could not write {}", path.display()))
        }
    }
}
