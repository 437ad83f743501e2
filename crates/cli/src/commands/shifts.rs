//! Layout shifts

use anyhow::Result;
use colored::Colorize;
use report_lib::report::{format_ms, LayoutShiftVisual, ReportModel, VitalKind};
use tabled::Tabled;

use crate::output::{color_rating, format_vital, print_heading, print_json, print_table, OutputFormat};

/// Row for the layout shift table
#[derive(Tabled)]
struct ShiftRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Cumulative")]
    cumulative: String,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Moved")]
    moved: String,
}

fn moved_nodes(shift: &LayoutShiftVisual) -> String {
    let nodes: Vec<&str> = shift
        .sources
        .iter()
        .map(|s| s.node.as_deref().unwrap_or("?"))
        .collect();
    if nodes.is_empty() {
        "-".to_string()
    } else {
        nodes.join(", ")
    }
}

/// Show layout shifts in capture order
pub fn show_shifts(model: &ReportModel, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&model.layout_shifts)?,
        OutputFormat::Table => {
            print_heading("Layout Shifts");
            let rows: Vec<ShiftRow> = model
                .layout_shifts
                .iter()
                .map(|shift| ShiftRow {
                    time: format_ms(shift.start_time_ms),
                    score: format!("{:.4}", shift.value),
                    cumulative: format!("{:.4}", shift.cumulative_score),
                    input: if shift.had_recent_input {
                        "yes".yellow().to_string()
                    } else {
                        "no".to_string()
                    },
                    moved: moved_nodes(shift),
                })
                .collect();
            print_table(&rows, "No layout shifts recorded");

            let cls = &model.vitals.cls;
            println!(
                "CLS:                    {} {}",
                format_vital(VitalKind::Cls, cls),
                color_rating(cls.rating)
            );
        }
    }

    Ok(())
}
