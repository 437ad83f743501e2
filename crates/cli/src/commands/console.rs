//! Console messages

use anyhow::Result;
use colored::Colorize;
use report_lib::report::{ConsoleEntry, ConsoleLevel, ReportModel};
use tabled::Tabled;

use crate::output::{print_heading, print_json, print_table, truncate, OutputFormat};

/// Row for the console table
#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    text: String,
    #[tabled(rename = "Source")]
    source: String,
}

const TEXT_WIDTH: usize = 80;

fn color_level(level: ConsoleLevel) -> String {
    match level {
        ConsoleLevel::Error => level.as_str().red().to_string(),
        ConsoleLevel::Warning => level.as_str().yellow().to_string(),
        ConsoleLevel::Info => level.as_str().blue().to_string(),
        ConsoleLevel::Debug => level.as_str().dimmed().to_string(),
        ConsoleLevel::Log | ConsoleLevel::Other => level.as_str().to_string(),
    }
}

/// Show console messages, optionally only one level
pub fn show_console(model: &ReportModel, level: Option<ConsoleLevel>, format: OutputFormat) -> Result<()> {
    let entries: Vec<&ConsoleEntry> = model
        .console
        .iter()
        .filter(|e| level.map_or(true, |l| e.level == l))
        .collect();

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Table => {
            print_heading("Console");
            let rows: Vec<MessageRow> = entries
                .iter()
                .map(|e| MessageRow {
                    level: color_level(e.level),
                    text: truncate(&e.text, TEXT_WIDTH),
                    source: e.source.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            print_table(&rows, "No console messages");

            let summary = &model.console_summary;
            println!(
                "{} total: {} error, {} warning, {} info, {} log, {} debug, {} other",
                summary.total,
                summary.error,
                summary.warning,
                summary.info,
                summary.log,
                summary.debug,
                summary.other
            );
        }
    }

    Ok(())
}
