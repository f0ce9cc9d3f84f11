use std::fmt::Write;

use colored::Colorize;
use foldiff_regions::UnchangedRegion;
use foldiff_types::{LineRange, LineRangeMapping};
use serde::Serialize;

/// Outcome of one comparison, as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct Report {
    pub original_path: String,
    pub modified_path: String,
    pub identical: bool,
    pub quit_early: bool,
    pub changes: Vec<LineRangeMapping>,
    pub regions: Vec<UnchangedRegion>,
}

impl Report {
    /// Unified view of the modified document: removed lines, added lines,
    /// and unchanged lines with folded regions collapsed to a marker.
    pub fn render_text(&self, original: &str, modified: &str) -> String {
        let original: Vec<&str> = original.lines().collect();
        let modified: Vec<&str> = modified.lines().collect();
        let mut out = String::new();

        let _ = writeln!(out, "{} {}", "---".red(), self.original_path);
        let _ = writeln!(out, "{} {}", "+++".green(), self.modified_path);
        if self.identical {
            let _ = writeln!(out, "{}", "Files are identical.".green());
        }
        if self.quit_early {
            let _ = writeln!(out, "{}", "Diff hit its time budget; result is coarse.".yellow());
        }

        let mut next = 1;
        for change in &self.changes {
            self.write_unchanged(&mut out, &modified, LineRange::new(next, change.modified.start));
            let _ = writeln!(
                out,
                "{}",
                format!("@@ {} -> {} {} @@", change.original, change.modified, change_kind(change)).cyan()
            );
            for line in change.original.start..change.original.end_exclusive {
                let text = original.get(line - 1).copied().unwrap_or_default();
                let _ = writeln!(out, "{}", format!("-{line:>5} | {text}").red());
            }
            for line in change.modified.start..change.modified.end_exclusive {
                let text = modified.get(line - 1).copied().unwrap_or_default();
                let _ = writeln!(out, "{}", format!("+{line:>5} | {text}").green());
            }
            next = change.modified.end_exclusive;
        }
        self.write_unchanged(&mut out, &modified, LineRange::new(next, modified.len() + 1));
        out
    }

    fn write_unchanged(&self, out: &mut String, modified: &[&str], span: LineRange) {
        for line in span.start..span.end_exclusive {
            let hidden = self
                .regions
                .iter()
                .map(UnchangedRegion::hidden_modified_range)
                .find(|range| range.contains(line));
            match hidden {
                Some(range) if range.start == line => {
                    let marker = format!("  ... {} unchanged lines folded", range.len());
                    let _ = writeln!(out, "{}", marker.dimmed());
                }
                Some(_) => {}
                None => {
                    let text = modified.get(line - 1).copied().unwrap_or_default();
                    let _ = writeln!(out, " {line:>5} | {text}");
                }
            }
        }
    }
}

fn change_kind(change: &LineRangeMapping) -> &'static str {
    if change.is_insertion() {
        "added"
    } else if change.is_deletion() {
        "removed"
    } else {
        "changed"
    }
}
