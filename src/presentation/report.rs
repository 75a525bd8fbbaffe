// Console output for a sync run
use crate::application::sync_service::{DashboardOutcome, SyncReporter};
use crate::domain::dashboard::DashboardSummary;
use crate::domain::diff::{DiffKind, Hunk};
use crate::domain::sync_status::{SyncReport, SyncStatus};
use crate::error::SyncError;
use colored::Colorize;

const RULE_WIDTH: usize = 60;

/// Prints status lines and diffs to stdout, failures to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

pub fn status_tag(status: SyncStatus) -> String {
    match status {
        SyncStatus::Missing => "[MISSING]".green().to_string(),
        SyncStatus::Changed => "[CHANGED]".yellow().to_string(),
        SyncStatus::Identical => "[IDENTICAL]".dimmed().to_string(),
    }
}

pub fn status_line(outcome: &DashboardOutcome) -> String {
    format!("{} {} -> {}", status_tag(outcome.status), outcome.title, outcome.path.display())
}

pub fn hunk_lines(hunk: &Hunk) -> Vec<String> {
    let mut lines = Vec::with_capacity(hunk.lines.len() + 1);
    lines.push(hunk.to_string().cyan().to_string());
    for line in &hunk.lines {
        let rendered = match line.kind {
            DiffKind::Added => format!("+{}", line.text).green().to_string(),
            DiffKind::Removed => format!("-{}", line.text).red().to_string(),
            DiffKind::Unchanged => format!(" {}", line.text),
        };
        lines.push(rendered);
    }
    lines
}

pub fn summary_lines(report: &SyncReport, sync: bool) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone()];

    if report.has_changes() {
        if sync {
            lines.push(format!("{} Sync complete. Local files updated.", "[SUCCESS]".green().bold()));
        } else {
            lines.push(format!(
                "{} DRY RUN COMPLETE. Changes detected but NOT saved.",
                "[WARN]".yellow().bold()
            ));
            lines.push(format!("       Run with {} to overwrite local files.", "--sync".bold()));
        }
    } else {
        lines.push(format!(
            "{} No changes detected. Local files match remote.",
            "[OK]".green().bold()
        ));
    }

    lines.push(format!(
        "{} dashboards: {} identical, {} changed, {} missing, {} renamed, {} written, {} failed",
        report.total,
        report.identical,
        report.changed,
        report.missing,
        report.renamed,
        report.written,
        report.failed
    ));
    if report.has_failures() {
        lines.push(format!(
            "{} {} dashboard(s) were skipped; see errors above.",
            "[ERROR]".red().bold(),
            report.failed
        ));
    }
    lines.push(rule);
    lines
}

impl SyncReporter for ConsoleReporter {
    fn started(&mut self, dashboards: usize) {
        println!("Found {} dashboards. Processing...", dashboards);
    }

    fn dashboard(&mut self, outcome: &DashboardOutcome) {
        if let Some(old) = &outcome.renamed_from {
            println!("{} {} -> {}", "[RENAME]".cyan(), old.display(), outcome.path.display());
        }
        println!("{}", status_line(outcome));
        for hunk in outcome.diff.iter().flatten() {
            for line in hunk_lines(hunk) {
                println!("{}", line);
            }
        }
    }

    fn saved(&mut self, outcome: &DashboardOutcome) {
        tracing::debug!("Saved {} to {}", outcome.uid, outcome.path.display());
        println!("  -> Saved.");
    }

    fn failed(&mut self, summary: &DashboardSummary, error: &SyncError) {
        eprintln!("{} {} ({}): {}", "[ERROR]".red(), summary.title, summary.uid, error);
    }

    fn finished(&mut self, report: &SyncReport, sync: bool) {
        println!();
        for line in summary_lines(report, sync) {
            println!("{}", line);
        }
    }
}
