//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a harvest
//! run: timings, stop reasons and success/skip counts.

use crate::crawler::{HarvestStop, PaginationStop};
use crate::output::traits::{HarvestReport, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
pub fn generate_markdown_summary(report: &HarvestReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a harvest report as markdown
pub fn format_markdown_summary(report: &HarvestReport) -> String {
    let mut md = String::new();

    md.push_str("# Recipe Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Listing**: {}\n", report.listing_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!("- **Dataset**: {}\n\n", report.dataset_path));

    md.push_str("## Link Collection\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", report.pages_visited));
    md.push_str(&format!("- **Links Collected**: {}\n", report.links_collected));
    md.push_str(&format!(
        "- **Stopped Because**: {}\n\n",
        describe_pagination_stop(report.pagination_stop)
    ));

    md.push_str("## Recipes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Processed | {} |\n", report.links_processed));
    md.push_str(&format!("| Harvested | {} |\n", report.success_count));
    md.push_str(&format!("| Skipped | {} |\n", report.skip_count));
    md.push_str(&format!("| - fetch failed | {} |\n", report.transport_skips));
    md.push_str(&format!("| - incomplete page | {} |\n", report.incomplete_skips));
    md.push('\n');
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        report.success_rate()
    ));
    md.push_str(&format!(
        "- **Stopped Because**: {}\n",
        describe_harvest_stop(report.harvest_stop)
    ));

    md
}

fn describe_pagination_stop(stop: PaginationStop) -> String {
    match stop {
        PaginationStop::TargetReached => "target link count reached".to_string(),
        PaginationStop::EmptyPage { page } => format!("page {} had no recipe links", page),
        PaginationStop::PageCeiling { page } => format!("page ceiling reached at page {}", page),
    }
}

fn describe_harvest_stop(stop: HarvestStop) -> &'static str {
    match stop {
        HarvestStop::TargetReached => "target recipe count reached",
        HarvestStop::LinksExhausted => "all collected links processed",
    }
}
