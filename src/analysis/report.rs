use std::fmt::Write;
use std::path::Path;

use super::types::Verdict;

const WIDTH: usize = 80;

/// One line of the summary table.
pub struct ReportRow<'a> {
    pub image: &'a Path,
    pub result: &'a str,
}

/// Renders the fixed-width leaf health report printed at the end of a run.
pub fn render_report(rows: &[ReportRow<'_>], verdict: &Verdict) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", heavy);
    let _ = writeln!(out, "{:^width$}", "FINAL LEAF HEALTH REPORT", width = WIDTH);
    let _ = writeln!(out, "{}", heavy);
    let _ = writeln!(out, "{:<8}{:<25}{:<45}", "S.No.", "Image Name", "Detected Result");
    let _ = writeln!(out, "{}", light);

    for (i, row) in rows.iter().enumerate() {
        let name = row
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _ = writeln!(out, "{:<8}{:<25}{:<45}", i + 1, name, row.result);
    }

    let _ = writeln!(out, "{}", light);
    let _ = writeln!(out, "{:<33}{:<15}", "Overall Leaf Condition:", verdict.status);
    let _ = writeln!(out, "{:<33}{:?}%", "Infection Percentage:", verdict.percentage);
    let _ = writeln!(out, "{}", heavy);
    out
}
