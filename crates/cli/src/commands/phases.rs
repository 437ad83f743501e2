//! Page-level timing phases

use anyhow::Result;
use report_lib::phases::TimingPhases;
use report_lib::report::{format_ms, LegendEntry, ReportModel};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_pct, print_heading, print_json, print_table, print_warning, OutputFormat};

/// Row for the phases table
#[derive(Tabled)]
struct PhaseRow {
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Bar")]
    bar: String,
}

#[derive(Serialize)]
struct PhasesView<'a> {
    total_ms: f64,
    phases: &'a TimingPhases,
    legend: &'a [LegendEntry],
}

const BAR_WIDTH: usize = 30;

fn share_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

/// Show the page-load phases
pub fn show_phases(model: &ReportModel, format: OutputFormat) -> Result<()> {
    let Some(phases) = &model.page_timings else {
        match format {
            OutputFormat::Json => print_json(&serde_json::Value::Null)?,
            OutputFormat::Table => print_warning("No navigation timing captured"),
        }
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            print_json(&PhasesView {
                total_ms: phases.total_ms,
                phases,
                legend: &model.legend,
            })?;
        }
        OutputFormat::Table => {
            print_heading("Page Load Phases");
            let rows: Vec<PhaseRow> = model
                .legend
                .iter()
                .map(|entry| PhaseRow {
                    phase: entry.label.clone(),
                    duration: format_ms(entry.duration_ms),
                    share: format_pct(entry.percent),
                    bar: share_bar(entry.percent),
                })
                .collect();
            print_table(&rows, "No phases recorded");
            println!("Total load time:        {}", format_ms(phases.total_ms));
        }
    }

    Ok(())
}
