//! Network waterfall

use anyhow::Result;
use colored::Colorize;
use report_lib::report::{format_bytes, format_ms, ReportModel, WaterfallRow};
use report_lib::ResourceType;
use tabled::Tabled;

use crate::output::{print_heading, print_json, print_table, print_warning, truncate, OutputFormat};

/// Row for the waterfall table
#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Status")]
    status: u16,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Timeline")]
    timeline: String,
}

const TIMELINE_WIDTH: usize = 40;
const NAME_WIDTH: usize = 40;

/// Text bar for one row, positioned over the observed span
fn timeline_bar(offset_pct: f64, width_pct: f64) -> String {
    let scale = |pct: f64| ((pct.clamp(0.0, 100.0) / 100.0) * TIMELINE_WIDTH as f64).round() as usize;
    let start = scale(offset_pct).min(TIMELINE_WIDTH - 1);
    let len = scale(width_pct).clamp(1, TIMELINE_WIDTH - start);
    format!(
        "{}{}{}",
        " ".repeat(start),
        "▇".repeat(len),
        " ".repeat(TIMELINE_WIDTH - start - len)
    )
}

/// Rows matching the type filter, capped at `limit`, with their 1-based index
fn select_rows(
    rows: &[WaterfallRow],
    resource_type: Option<ResourceType>,
    limit: Option<usize>,
) -> Vec<(usize, &WaterfallRow)> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| resource_type.map_or(true, |t| row.resource_type == t))
        .map(|(i, row)| (i + 1, row))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Show the waterfall
pub fn show_waterfall(
    model: &ReportModel,
    resource_type: Option<ResourceType>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let selected = select_rows(&model.waterfall.rows, resource_type, limit);

    match format {
        OutputFormat::Json => {
            let rows: Vec<&WaterfallRow> = selected.iter().map(|(_, row)| *row).collect();
            print_json(&rows)?;
        }
        OutputFormat::Table => {
            if !model.has_network_data {
                print_warning("No network data captured");
                return Ok(());
            }

            print_heading("Network Waterfall");
            let table_rows: Vec<RequestRow> = selected
                .iter()
                .map(|(index, row)| {
                    let name = truncate(&row.label, NAME_WIDTH);
                    RequestRow {
                        index: *index,
                        name: if row.is_lcp {
                            format!("{} {}", name, "[LCP]".magenta().bold())
                        } else {
                            name
                        },
                        resource_type: row.resource_type.to_string(),
                        status: row.status,
                        size: row.size_label.clone(),
                        start: format_ms(row.start_ms),
                        duration: format_ms(row.duration_ms),
                        timeline: timeline_bar(row.offset_pct, row.width_pct),
                    }
                })
                .collect();
            print_table(&table_rows, "No requests match the filter");

            let summary = &model.waterfall.summary;
            println!(
                "{} requests, {} transferred, {} span",
                summary.request_count,
                summary.total_bytes_label,
                format_ms(summary.span_ms)
            );
            for breakdown in &summary.by_type {
                println!(
                    "  {:<12} {:>4}  {}",
                    breakdown.resource_type.to_string(),
                    breakdown.count,
                    format_bytes(breakdown.bytes)
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_lib::phases::RequestTimings;

    fn row(url: &str, resource_type: ResourceType) -> WaterfallRow {
        WaterfallRow {
            url: url.to_string(),
            label: url.to_string(),
            method: "GET".to_string(),
            status: 200,
            resource_type,
            size_bytes: 0,
            size_label: "0 B".to_string(),
            start_ms: 0.0,
            duration_ms: 0.0,
            offset_pct: 0.0,
            width_pct: 0.0,
            timings: RequestTimings::default(),
            is_lcp: false,
        }
    }

    #[test]
    fn test_timeline_bar() {
        let bar = timeline_bar(25.0, 50.0);
        assert_eq!(bar.chars().count(), TIMELINE_WIDTH);
        assert_eq!(bar.chars().take_while(|c| *c == ' ').count(), 10);
        assert_eq!(bar.chars().filter(|c| *c == '▇').count(), 20);

        // zero-width requests still get a visible tick
        assert_eq!(timeline_bar(100.0, 0.0).chars().filter(|c| *c == '▇').count(), 1);
    }

    #[test]
    fn test_select_rows_keeps_row_index() {
        let rows = vec![
            row("a.html", ResourceType::Document),
            row("a.js", ResourceType::Script),
            row("b.js", ResourceType::Script),
            row("c.js", ResourceType::Script),
        ];

        let selected = select_rows(&rows, Some(ResourceType::Script), Some(2));
        let indexes: Vec<usize> = selected.iter().map(|(i, _)| *i).collect();
        assert_eq!(indexes, vec![2, 3]);

        assert_eq!(select_rows(&rows, None, None).len(), 4);
    }
}
