//! Console statistics for a finished run

use crate::output::traits::HarvestReport;

/// Prints the run outcome to stdout in a formatted manner
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Statistics ===\n");

    println!("Links:");
    println!("  Listing pages visited: {}", report.pages_visited);
    println!("  Recipe links collected: {}", report.links_collected);
    println!();

    println!("Recipes:");
    println!("  Processed: {}", report.links_processed);
    println!("  Harvested: {}", report.success_count);
    println!(
        "  Skipped: {} ({} fetch failures, {} incomplete pages)",
        report.skip_count, report.transport_skips, report.incomplete_skips
    );
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} links)",
        report.success_rate(),
        report.success_count,
        report.links_processed
    );
    println!("Dataset: {}", report.dataset_path);
}
