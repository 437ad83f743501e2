//! Run overview: vitals, network and console totals

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use report_lib::collector::ArtifactListing;
use report_lib::report::{
    format_ms, ConsoleSummary, LcpAttribution, ReportModel, VitalKind, WaterfallSummary,
    WebVitals,
};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{
    color_rating, format_vital, print_heading, print_json, print_table, print_warning,
    OutputFormat,
};

/// Row for the vitals table
#[derive(Tabled)]
struct VitalRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    url: Option<&'a str>,
    generated_at: String,
    engine: String,
    has_network_data: bool,
    vitals: &'a WebVitals,
    lcp: Option<&'a LcpAttribution>,
    network: &'a WaterfallSummary,
    console: &'a ConsoleSummary,
    artifacts: &'a ArtifactListing,
}

fn vital_rows(vitals: &WebVitals) -> Vec<VitalRow> {
    VitalKind::ALL
        .iter()
        .map(|kind| {
            let vital = vitals.get(*kind);
            VitalRow {
                metric: format!("{} ({})", kind.abbreviation(), kind.label()),
                value: format_vital(*kind, &vital),
                rating: color_rating(vital.rating),
            }
        })
        .collect()
}

/// Show the run summary
pub fn show_summary(model: &ReportModel, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let view = SummaryView {
                url: model.url.as_deref(),
                generated_at: model.generated_at.to_rfc3339(),
                engine: model.engine.to_string(),
                has_network_data: model.has_network_data,
                vitals: &model.vitals,
                lcp: model.lcp.as_ref(),
                network: &model.waterfall.summary,
                console: &model.console_summary,
                artifacts: &model.artifacts,
            };
            print_json(&view)?;
        }
        OutputFormat::Table => {
            print_heading("Page Load Summary");
            println!(
                "URL:                    {}",
                model.url.as_deref().unwrap_or("-").cyan()
            );
            println!("Engine:                 {}", model.engine);
            println!(
                "Generated:              {}",
                model
                    .generated_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
            println!();

            print_table(&vital_rows(&model.vitals), "No vitals captured");

            if let Some(lcp) = &model.lcp {
                let target = lcp
                    .url
                    .as_deref()
                    .or(lcp.element.as_deref())
                    .unwrap_or("text");
                println!("LCP element:            {}", target);
            }
            println!();

            println!("{}", "Network".bold());
            println!("{}", "-".repeat(50));
            if model.has_network_data {
                let summary = &model.waterfall.summary;
                println!("Requests:               {}", summary.request_count);
                println!("Transferred:            {}", summary.total_bytes_label);
                println!("Span:                   {}", format_ms(summary.span_ms));
            } else {
                print_warning("No network data captured");
            }
            println!();

            let console = &model.console_summary;
            println!("{}", "Console".bold());
            println!("{}", "-".repeat(50));
            println!(
                "Messages:               {} ({} errors, {} warnings)",
                console.total,
                if console.error > 0 {
                    console.error.to_string().red().to_string()
                } else {
                    console.error.to_string()
                },
                console.warning
            );
            println!();

            let artifacts = &model.artifacts;
            println!("{}", "Artifacts".bold());
            println!("{}", "-".repeat(50));
            println!("Filmstrip frames:       {}", artifacts.filmstrip.len());
            println!(
                "Screenshot:             {}",
                artifacts.screenshot.as_deref().unwrap_or("-")
            );
            println!(
                "Video:                  {}",
                artifacts.video.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
