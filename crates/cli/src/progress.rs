//! Progress spinners and the summary report

use indicatif::{ProgressBar, ProgressStyle};
use rowdedup_core::DedupReport;
use std::path::Path;
use std::time::Duration;

/// Spinner shown while a dataset is loaded or saved
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Start a spinner with the given message, hidden when `quiet`
    pub fn spinner(message: impl Into<String>, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let style = ProgressStyle::with_template("[{elapsed_precise}] {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Stop the spinner, leaving a final message
    pub fn finish(&self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }
}

/// Print a formatted summary report
pub fn print_summary_report(
    input: &Path,
    output: Option<&Path>,
    dry_run: bool,
    report: &DedupReport,
) {
    println!("\n{}", "═".repeat(60));
    println!("Dataset Deduplication Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());

    println!("Output:             {}", output_label(output, dry_run));

    println!("Total rows:         {}", format_with_commas(report.rows_before));

    if report.removed() > 0 {
        println!(
            "Duplicates removed: {} ({:.1}%)",
            format_with_commas(report.removed()),
            percent(report.removed(), report.rows_before)
        );
    }

    println!(
        "Final dataset:      {} ({:.1}%)",
        format_with_commas(report.rows_after),
        percent(report.rows_after, report.rows_before)
    );

    println!("{}", "═".repeat(60));
}

/// Written path, or why nothing was written
fn output_label(output: Option<&Path>, dry_run: bool) -> String {
    match output {
        Some(path) => path.display().to_string(),
        None if dry_run => "(dry run - no output written)".to_string(),
        None => "(no output file given)".to_string(),
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Format number with thousand separators
pub fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(1234), "1,234");
        assert_eq!(format_with_commas(1234567), "1,234,567");
        assert_eq!(format_with_commas(123456), "123,456");
        assert_eq!(format_with_commas(42), "42");
        assert_eq!(format_with_commas(0), "0");
    }

    #[test]
    fn test_output_label() {
        let path = Path::new("out.jsonl");
        assert_eq!(output_label(Some(path), false), "out.jsonl");
        assert_eq!(output_label(None, true), "(dry run - no output written)");
        assert_eq!(output_label(None, false), "(no output file given)");
    }

    #[test]
    fn test_percent_of_empty() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
