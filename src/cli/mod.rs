//! CLI Module
//!
//! Command-line interface for the imgprep pipeline.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// imgprep - batch preprocessing for tiered image datasets
#[derive(Parser, Debug)]
#[command(name = "imgprep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the pipeline configuration comes from
#[derive(Args, Debug, Clone)]
pub struct ConfigSource {
    /// JSON pipeline configuration
    #[arg(short, long, conflicts_with_all = ["source", "dest"])]
    pub config: Option<PathBuf>,

    /// Dataset root (uses the built-in Hey-Waldo layout)
    #[arg(long, requires = "dest")]
    pub source: Option<PathBuf>,

    /// Output root (uses the built-in Hey-Waldo layout)
    #[arg(long, requires = "source")]
    pub dest: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline over the dataset
    #[command(name = "run")]
    Run {
        #[command(flatten)]
        source: ConfigSource,

        /// Process files one at a time instead of on the thread pool
        #[arg(long)]
        sequential: bool,

        /// Leave existing output files untouched
        #[arg(long)]
        skip_existing: bool,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },

    /// List each source file and its destination without processing
    #[command(name = "plan")]
    Plan {
        #[command(flatten)]
        source: ConfigSource,
    },

    /// Write the built-in Hey-Waldo configuration to a file
    #[command(name = "init-config")]
    InitConfig {
        /// Where to write the configuration
        path: PathBuf,

        /// Dataset root to put in the configuration
        #[arg(long, default_value = "Hey-Waldo")]
        source: PathBuf,

        /// Output root to put in the configuration
        #[arg(long, default_value = "processed_data")]
        dest: PathBuf,
    },
}
