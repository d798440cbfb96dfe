use std::io::Write;
use std::time::Duration;

use resemblance::Comparison;

use crate::check::SnapshotStatus;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Mismatch percentage with enough precision to show values near the threshold.
pub fn format_percentage(p: f64) -> String {
    if p == 0.0 {
        "0%".to_string()
    } else if p < 0.01 {
        format!("{p:.4}%")
    } else {
        format!("{p:.2}%")
    }
}

/// Print a single check result line.
pub fn print_line(name: &str, status: &SnapshotStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        SnapshotStatus::Pass { .. } => {
            println!("  \x1b[32mPASS\x1b[0m  {name}{time_suffix}");
        }
        SnapshotStatus::Fail {
            mismatch_count,
            percentage,
        } => {
            println!(
                "  \x1b[31mFAIL\x1b[0m  {name}  ({mismatch_count} pixels, {}){time_suffix}",
                format_percentage(*percentage)
            );
        }
        SnapshotStatus::Resized { reference, current } => {
            println!(
                "  \x1b[31mFAIL\x1b[0m  {name}  (dimensions changed: {}x{} -> {}x{}){time_suffix}",
                reference.0, reference.1, current.0, current.1
            );
        }
        SnapshotStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (no reference){time_suffix}");
        }
        SnapshotStatus::Error { message } => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({message}){time_suffix}");
        }
    }
}

/// Print a reference that has no current image.
pub fn print_missing_line(name: &str) {
    clear_line();
    println!("  \x1b[2mMISS\x1b[0m  \x1b[2m{name}  (no current image)\x1b[0m");
}

/// Show check progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Print the outcome of a single `compare` invocation.
pub fn print_comparison(comparison: &Comparison) {
    match comparison {
        Comparison::DimensionMismatch { left, right } => {
            println!(
                "\x1b[31mDIFFERENT\x1b[0m  dimensions {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            );
        }
        Comparison::Analysed(analysis) => {
            let verdict = if analysis.is_equivalent() {
                "\x1b[32mSAME\x1b[0m"
            } else {
                "\x1b[31mDIFFERENT\x1b[0m"
            };
            println!(
                "{verdict}  {} mismatched of {}x{} (step {}), difference {}",
                analysis.mismatch_count,
                analysis.width,
                analysis.height,
                analysis.step,
                format_percentage(analysis.mismatch_percentage)
            );
        }
    }
}

/// Print an actionable summary listing ids grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(
    failed: &[String],
    new: &[String],
    errored: &[String],
    missing: &[String],
) {
    if failed.is_empty() && new.is_empty() && errored.is_empty() && missing.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable images:");

    for (label, names) in [
        ("Failed", failed),
        ("New", new),
        ("Errored", errored),
        ("Missing", missing),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Counts for the final summary line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub missing: usize,
}

impl Tally {
    pub fn record(&mut self, status: &SnapshotStatus) {
        match status {
            SnapshotStatus::Pass { .. } => self.passed += 1,
            SnapshotStatus::Fail { .. } | SnapshotStatus::Resized { .. } => self.failed += 1,
            SnapshotStatus::New => self.new += 1,
            SnapshotStatus::Error { .. } => self.errored += 1,
        }
    }

    /// Missing references do not affect the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 || self.new > 0 || self.errored > 0 {
            1
        } else {
            0
        }
    }
}

/// Print the final summary.
pub fn print_summary(tally: &Tally, elapsed: Duration) {
    let Tally {
        total,
        passed,
        failed,
        new,
        errored,
        missing,
    } = *tally;

    clear_line();
    println!();
    print!(
        "Images:  {total} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m"
    );
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    if missing > 0 {
        print!(", \x1b[2m{missing} missing\x1b[0m");
    }
    println!();
    println!("Time:    {}", format_duration(elapsed));

    if failed > 0 || new > 0 || errored > 0 || missing > 0 {
        println!();
        if failed > 0 {
            println!("{failed} image(s) have visual differences.");
        }
        if new > 0 {
            println!("{new} image(s) have no reference.");
        }
        if errored > 0 {
            println!("{errored} image(s) could not be compared.");
        }
        if missing > 0 {
            println!("{missing} reference(s) have no current image.");
        }
        if failed > 0 || new > 0 {
            println!("Run `resemblance approve` to accept the current images.");
        }
    }
}
