//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use report_lib::report::{format_ms, format_number, Rating, VitalKind, WebVital};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or a notice when there are none
pub fn print_table<T: Tabled>(items: &[T], empty_message: &str) {
    if items.is_empty() {
        print_warning(empty_message);
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a rating by tier
pub fn color_rating(rating: Option<Rating>) -> String {
    match rating {
        Some(Rating::Good) => Rating::Good.as_str().green().to_string(),
        Some(Rating::NeedsImprovement) => Rating::NeedsImprovement.as_str().yellow().to_string(),
        Some(Rating::Poor) => Rating::Poor.as_str().red().to_string(),
        None => "-".dimmed().to_string(),
    }
}

/// Vital value with its unit, `-` when not measured
pub fn format_vital(kind: VitalKind, vital: &WebVital) -> String {
    match vital.value {
        Some(value) if kind.is_unitless() => format!("{:.3}", value),
        Some(value) => format_ms(value),
        None => "-".to_string(),
    }
}

/// Percentage with one decimal
pub fn format_pct(value: f64) -> String {
    format!("{}%", format_number((value * 10.0).round() / 10.0))
}

/// Cut text to `max` characters, marking the cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
