//! # CLI Module - Command Line Interface for Criticality Runs
//!
//! Two subcommands cover the workflow:
//!
//! ## `run`
//!
//! Loads an [`EngineConfig`](crate::config::EngineConfig) from a TOML file, builds the
//! reference bare-sphere world and point source, executes the inactive and active
//! cycles, and prints the final tally report.
//!
//! **Usage**:
//! ```bash
//! helios-kcode run --config run.toml
//! ```
//!
//! ## `check`
//!
//! Loads and validates a config file (recognised keys, scheduler policy, nonzero
//! particle count) without running any cycles. Analogous to a dry run.
//!
//! **Usage**:
//! ```bash
//! helios-kcode check --config run.toml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a config file and execute a criticality calculation
    Run {
        /// Path to the TOML run configuration
        #[arg(short, long, default_value = "run.toml")]
        config: PathBuf,

        /// Reference-scenario sphere radius (cm), until a real CSG deck loader exists
        #[arg(long, default_value_t = 10.0)]
        radius: f64,

        /// Also persist the final report under ./data/criticality/
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Validate a config file without running any cycles
    Check {
        /// Path to the TOML run configuration
        #[arg(short, long, default_value = "run.toml")]
        config: PathBuf,
    },
}
