//! Formatting and reporting for health check results

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a health check report as a table plus summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["System", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        let duration_str = format!("{:.2?}", result.duration);
        builder.push_record([
            name.as_str(),
            &result.status.as_colored_str(),
            &duration_str,
            &result.message,
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&format_summary(report));
    output
}

/// Per-check detail sections; failing checks first
pub fn format_details(report: &HealthCheckReport) -> String {
    let mut sections: Vec<_> = report
        .results
        .iter()
        .filter_map(|(name, result)| result.details.as_ref().map(|d| (name, result.status, d)))
        .collect();
    sections.sort_by_key(|(_, status, _)| std::cmp::Reverse(*status));

    let mut output = String::new();
    for (name, _, details) in sections {
        output.push_str(&format!("\n{} Details:\n{}\n", name.bold(), details));
    }
    output
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("\n{}\n", "Summary".bold().underline()));
    summary.push_str(&format!("  Total checks: {}\n", report.total));
    summary.push_str(&format!("  {} Passed: {}\n", "✓".green(), report.passed));

    if report.warned > 0 {
        summary.push_str(&format!("  {} Warned: {}\n", "⚠".yellow(), report.warned));
    }

    if report.failed > 0 {
        summary.push_str(&format!("  {} Failed: {}\n", "✗".red(), report.failed));
    }

    summary.push('\n');
    let overall = match (report.is_healthy(), report.has_warnings()) {
        (true, false) => "Overall: HEALTHY".green().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (false, _) => "Overall: UNHEALTHY".red().bold(),
    };
    summary.push_str(&format!("  {}\n", overall));

    summary
}

/// Prints a report to stdout, optionally with per-check details
pub fn print_report(report: &HealthCheckReport, verbose: bool) {
    println!("{}", format_report(report));
    if verbose {
        print!("{}", format_details(report));
    }
}
