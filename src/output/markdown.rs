//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including statistics, outcome breakdowns and failed URLs.

use crate::output::stats::CrawlStatistics;
use crate::output::traits::OutputResult;
use crate::state::{Outcome, PageState};
use std::fs;
use std::path::Path;

/// Maximum number of failed URLs listed in a summary
const MAX_LISTED_FAILURES: usize = 50;

/// Generates a markdown summary from crawl statistics
///
/// # Arguments
///
/// * `stats` - Statistics of the finished run
/// * `config_hash` - Hash of the configuration the run used
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    stats: &CrawlStatistics,
    config_hash: &str,
    output_path: &Path,
) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(output_path, format_markdown_summary(stats, config_hash))?;
    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics, config_hash: &str) -> String {
    let mut md = String::new();

    md.push_str("# Sitesift Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.pages_visited));
    md.push_str(&format!("- **Pages Indexed**: {}\n", stats.pages_indexed()));
    md.push_str(&format!(
        "- **Links Discovered**: {}\n",
        stats.links_discovered
    ));
    md.push_str(&format!("- **Hosts Contacted**: {}\n", stats.unique_hosts));
    md.push_str(&format!(
        "- **Left in Frontier**: {}\n",
        stats.frontier_remaining
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Outcome breakdown
    md.push_str("## Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    for outcome in [
        Outcome::Indexed,
        Outcome::Duplicate,
        Outcome::Denied,
        Outcome::Failed,
        Outcome::Skipped,
    ] {
        md.push_str(&format!(
            "| {} | {} |\n",
            outcome,
            stats.outcome_count(outcome)
        ));
    }
    md.push('\n');

    // State breakdown
    md.push_str("## Page State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    for state in PageState::terminal_states() {
        md.push_str(&format!("| {} | {} |\n", state, stats.count(state)));
    }
    md.push('\n');

    // Depth breakdown
    if !stats.depth_breakdown.is_empty() {
        md.push_str("## Indexed Pages by Depth\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &stats.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    // Failed URLs
    if !stats.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");
        for (url, error) in stats.failed_urls.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!("| {} | {} |\n", url, error.replace('|', "\\|")));
        }
        if stats.failed_urls.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.failed_urls.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}
