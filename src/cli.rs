//! CLI argument parsing for trout

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "trout")]
#[command(version)]
#[command(about = "Behavioral trace diffing and malicious behavior injection", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count the differences between two traces
    Diff {
        /// Baseline trace file
        trace_x: PathBuf,

        /// Trace file to compare against the baseline
        trace_y: PathBuf,

        /// Compare full descriptors including argument lists
        #[arg(long = "keep-arguments", conflicts_with = "ignore_arguments")]
        keep_arguments: bool,

        /// Compare call names only (overrides `ignore_arguments = false` in the config)
        #[arg(long = "ignore-arguments")]
        ignore_arguments: bool,
    },

    /// Inject malicious behaviors into a benign trace
    Inject {
        /// Benign trace file
        trace: PathBuf,

        /// Per-offset insertion probability (0.0-1.0)
        #[arg(short = 'p', long = "probability", value_name = "P")]
        probability: Option<f64>,

        /// Draw a different random behavior for every insertion
        #[arg(short = 'm', long = "multiple", conflicts_with = "single")]
        multiple: bool,

        /// Reuse one behavior for every insertion (overrides `multiple_behaviors = true`)
        #[arg(long = "single")]
        single: bool,

        /// Seed for reproducible injection
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,

        /// Behavior store file
        #[arg(long = "store", value_name = "FILE")]
        store: Option<PathBuf>,

        /// Definitions file used to seed an empty store
        #[arg(long = "definitions", value_name = "FILE")]
        definitions: Option<PathBuf>,

        /// Write the injected trace here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List known behaviors, seeding the store if it is empty
    Behaviors {
        /// Behavior store file
        #[arg(long = "store", value_name = "FILE")]
        store: Option<PathBuf>,

        /// Definitions file used to seed an empty store
        #[arg(long = "definitions", value_name = "FILE")]
        definitions: Option<PathBuf>,
    },

    /// Persist a newly discovered behavior
    AddBehavior {
        /// Behavior description (e.g. "ransomware")
        description: String,

        /// Comma-separated call names (e.g. "encryptFile,deleteShadowCopy")
        calls: String,

        /// Behavior store file
        #[arg(long = "store", value_name = "FILE")]
        store: Option<PathBuf>,
    },

    /// Load a numeric feature vector
    Features {
        /// Feature file
        file: PathBuf,

        /// Separator for flat feature lists
        #[arg(short = 'd', long = "delimiter", value_name = "D")]
        delimiter: Option<String>,
    },
}

/// Resolve an on/off flag pair; `None` leaves the configured value in place
pub fn flag_override(enable: bool, disable: bool) -> Option<bool> {
    match (enable, disable) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
