//! # Bubble CLI Module
//!
//! This module implements the CLI interface for bubble.
//!
//! ## Available Commands
//!
//! - `validate` - Report structural problems of a bubble file
//! - `export` - Convert a bubble file to bubble, dot or gexf
//! - `stats` - Show node, edge and reduction metrics
//! - `components` - Show connected components
//! - `powernode` - Describe one powernode
//! - `show` - Dump the model as JSON

mod commands;

use crate::config::BubbleConfig;
use bubble_core::{BubbleError, ExportFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Bubble - power graph toolkit
///
/// Validates, inspects and converts power graphs written in the bubble format.
#[derive(Parser, Debug)]
#[command(name = "bubble")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML config file (default: ./bubble.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a bubble file
    Validate {
        /// Bubble file to check
        file: PathBuf,

        /// Also report counts of lines, roots, components and (power)nodes
        #[arg(short, long)]
        profiling: bool,
    },

    /// Export a bubble file to another format
    Export {
        /// Bubble file to convert
        file: PathBuf,

        /// Output file path (stdout if absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (bubble, dot, gexf)
        #[arg(short = 't', long)]
        format: Option<ExportFormat>,

        /// Keep edges directed
        #[arg(long)]
        oriented: bool,

        /// Omit NODE and SET declarations in bubble output
        #[arg(long)]
        no_declarations: bool,
    },

    /// Show power graph metrics
    Stats {
        /// Bubble file to inspect
        file: PathBuf,

        /// Keep edges directed
        #[arg(long)]
        oriented: bool,
    },

    /// Show connected components
    Components {
        /// Bubble file to inspect
        file: PathBuf,

        /// Keep edges directed
        #[arg(long)]
        oriented: bool,
    },

    /// Describe a powernode
    Powernode {
        /// Bubble file to inspect
        file: PathBuf,

        /// Powernode name
        name: String,
    },

    /// Dump edges, inclusions and roots as JSON
    Show {
        /// Bubble file to inspect
        file: PathBuf,

        /// Keep edges directed
        #[arg(long)]
        oriented: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything went fine.
    Success,
    /// Validation found at least one ERROR diagnostic.
    Invalid,
}

impl Outcome {
    /// Process exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Invalid => 2,
        }
    }
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<Outcome, BubbleError> {
    let config = BubbleConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Validate { file, profiling } => {
            let invalid = cmd_validate(&file, profiling || config.profiling, json_mode)?;
            return Ok(if invalid {
                Outcome::Invalid
            } else {
                Outcome::Success
            });
        }
        Commands::Export {
            file,
            output,
            format,
            oriented,
            no_declarations,
        } => {
            let format = resolve_format(format.or(config.format), output.as_deref());
            cmd_export(
                &file,
                output.as_deref(),
                format,
                oriented || config.oriented,
                config.declarations && !no_declarations,
                cli.quiet,
            )?;
        }
        Commands::Stats { file, oriented } => {
            cmd_stats(&file, oriented || config.oriented, json_mode)?;
        }
        Commands::Components { file, oriented } => {
            cmd_components(&file, oriented || config.oriented, json_mode)?;
        }
        Commands::Powernode { file, name } => {
            cmd_powernode(&file, &name, config.oriented, json_mode)?;
        }
        Commands::Show { file, oriented } => {
            cmd_show(&file, oriented || config.oriented)?;
        }
    }
    Ok(Outcome::Success)
}
