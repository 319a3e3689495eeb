//! Output formatting and display for pdfknife.
//!
//! This module handles all user-facing output of the command-line tool:
//! status messages, dry-run plans and operation summaries. Library code
//! reports through `tracing` instead.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::engine::{MergeStatistics, PlannedOutput, SplitStatistics};
use crate::io::WriteStatistics;
use crate::ops::{MergePlan, SplitPlan};

/// Describe a page group compactly, e.g. `1, 3-5, 1`.
pub fn describe_pages(pages: &[u32]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut iter = pages.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(&next) = iter.peek() {
            if next != end.saturating_add(1) {
                break;
            }
            end = next;
            iter.next();
        }
        runs.push(if start == end {
            start.to_string()
        } else {
            format!("{start}-{end}")
        });
    }

    runs.join(", ")
}

/// Display a split plan.
pub fn display_split_plan(formatter: &OutputFormatter, plan: &SplitPlan) {
    formatter.section(&format!(
        "Split plan for {} ({} pages):",
        plan.source, plan.source_pages
    ));
    display_planned_outputs(formatter, &plan.outputs);

    let dropped = plan.selections_requested - plan.outputs.len();
    if dropped > 0 {
        formatter.warning(&format!(
            "{dropped} selection(s) fall outside the document and will be skipped"
        ));
    }

    match &plan.archive {
        Some(archive) => formatter.info(&format!("Outputs would be packaged into {archive}")),
        None => formatter.info("The single output would be returned as a PDF"),
    }
}

fn display_planned_outputs(formatter: &OutputFormatter, outputs: &[PlannedOutput]) {
    for (index, output) in outputs.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!("{} (pages {})", output.name, describe_pages(&output.pages)),
        );
    }
}

/// Display a merge plan.
pub fn display_merge_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Merge plan:");
    for (index, source) in plan.sources.iter().enumerate() {
        formatter.list_item(index + 1, &format!("{} ({} pages)", source.name, source.pages));
    }
    formatter.info(&format!(
        "\n  Total pages in {}: {}",
        plan.output, plan.total_pages
    ));
}

/// Display split statistics.
pub fn display_split_statistics(formatter: &OutputFormatter, stats: &SplitStatistics) {
    if stats.groups_dropped > 0 {
        formatter.warning(&format!(
            "Skipped {} selection(s) outside the {}-page document",
            stats.groups_dropped, stats.source_pages
        ));
    }
    formatter.detail("Selections", &stats.groups_requested.to_string());
    formatter.detail("Pages written", &stats.pages_written.to_string());
    formatter.detail(
        "Time",
        &format!("{:.2}s", stats.split_time.as_secs_f64()),
    );
}

/// Display merge statistics.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.detail("Files", &stats.files_merged.to_string());
    formatter.detail("Pages", &stats.total_pages.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail(
        "Time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
}

/// Display the result of writing one output file.
pub fn display_written(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Wrote {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
}
