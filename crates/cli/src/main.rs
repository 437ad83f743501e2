//! loadscope CLI
//!
//! A command-line tool for inspecting the report of a captured page load:
//! vitals, page phases, network waterfall, layout shifts and console output.

mod commands;
mod config;
mod output;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{console, phases, shifts, summary, waterfall};
use report_lib::report::ConsoleLevel;
use report_lib::{BrowserEngine, ResourceType};
use std::path::PathBuf;

/// loadscope page-load report inspector
#[derive(Parser)]
#[command(name = "lsc")]
#[command(author, version, about = "Inspect loadscope page-load reports", long_about = None)]
pub struct Cli {
    /// Run directory to inspect
    #[arg(long, short = 'd', env = "LOADSCOPE_RUN_DIR", default_value = ".")]
    pub run_dir: PathBuf,

    /// Output format (defaults to the config file setting, then table)
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Browser engine the run was captured with, used when no report model
    /// has been written yet
    #[arg(long, env = "LOADSCOPE_ENGINE")]
    pub engine: Option<BrowserEngine>,

    /// Build the model from raw artifacts even if a written one exists
    #[arg(long)]
    pub rebuild: bool,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show web vitals and run totals
    Summary,

    /// Show page-load phases
    Phases,

    /// Show the network waterfall
    Waterfall {
        /// Only show one resource type (document, script, image, ...)
        #[arg(long = "type", short = 't')]
        resource_type: Option<ResourceType>,

        /// Show at most this many requests
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show layout shifts
    Shifts,

    /// Show console messages
    Console {
        /// Only show one level (error, warning, info, log, debug, other)
        #[arg(long, short)]
        level: Option<ConsoleLevel>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load()?;
    let format = config.resolve_format(cli.format)?;
    let engine = config.resolve_engine(cli.engine)?;

    let (model, origin) = source::load_model(&cli.run_dir, engine, cli.rebuild)?;
    if cli.verbose && format == output::OutputFormat::Table {
        match origin {
            source::ModelOrigin::Written => output::print_info("Using written report model"),
            source::ModelOrigin::Rebuilt => {
                output::print_info("Built report model from raw artifacts")
            }
        }
    }

    match cli.command {
        Commands::Summary => summary::show_summary(&model, format)?,
        Commands::Phases => phases::show_phases(&model, format)?,
        Commands::Waterfall {
            resource_type,
            limit,
        } => waterfall::show_waterfall(&model, resource_type, limit, format)?,
        Commands::Shifts => shifts::show_shifts(&model, format)?,
        Commands::Console { level } => console::show_console(&model, level, format)?,
    }

    Ok(())
}
