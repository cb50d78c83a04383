//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks, passing checks
//! - Red: errors, failing checks
//! - Yellow: warnings
//! - Cyan: paths, commands, variable names, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use colored::Colorize;
use std::fmt::Display;

use crate::core::journey::TrendStats;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ signed in`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", "✓".green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ key file not found`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message to stderr (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Goes to stderr so stdout stays clean for captured envelopes and codes.
///
/// Example: `→ run: loadcred keygen`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "→".cyan(), msg.cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold section header.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  chars:  12`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", label.dimmed(), value.to_string().bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a horizontal rule separator.
pub fn rule() {
    if colors_enabled() {
        println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    } else {
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Print a section header with a separator line.
///
/// Example:
/// ```text
/// Checks
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", msg.dimmed());
    } else {
        println!("{}", msg);
    }
}

/// Format a path string in cyan.
pub fn path(p: &str) -> String {
    if colors_enabled() {
        p.cyan().to_string()
    } else {
        p.to_string()
    }
}

/// Format a command string in green.
pub fn cmd(c: &str) -> String {
    if colors_enabled() {
        c.green().to_string()
    } else {
        c.to_string()
    }
}

/// Format a variable name in cyan.
pub fn key(k: &str) -> String {
    if colors_enabled() {
        k.cyan().to_string()
    } else {
        k.to_string()
    }
}

/// Print one timed request.
///
/// Example: `  Enter Password          200     184.2 ms`
pub fn sample(step: &str, status: u16, ms: f64) {
    let status_text = if status == 0 {
        "---".to_string()
    } else {
        status.to_string()
    };
    let ok = (200..400).contains(&status);
    if colors_enabled() {
        let status_text = if ok {
            status_text.green()
        } else {
            status_text.red()
        };
        println!("  {:<24}{:>5}  {:>9.1} ms", step, status_text, ms);
    } else {
        println!("  {:<24}{:>5}  {:>9.1} ms", step, status_text, ms);
    }
}

/// Print a check tally.
///
/// Example: `  ✓ Home Page Loaded Correctly  (3/3)`
pub fn check(name: &str, passes: u32, fails: u32) {
    let total = passes + fails;
    if colors_enabled() {
        let mark = if fails == 0 { "✓".green() } else { "✗".red() };
        println!("  {} {}  {}", mark, name, format!("({}/{})", passes, total).dimmed());
    } else {
        let mark = if fails == 0 { "✓" } else { "✗" };
        println!("  {} {}  ({}/{})", mark, name, passes, total);
    }
}

/// Print a response-time trend on one line.
pub fn trend(name: &str, stats: &TrendStats) {
    let line = format!(
        "avg={:.1} min={:.1} med={:.1} max={:.1} p(90)={:.1} p(95)={:.1} p(98)={:.1}",
        stats.avg, stats.min, stats.med, stats.max, stats.p90, stats.p95, stats.p98
    );
    if colors_enabled() {
        println!("  {:<24}{}", name.bold(), line);
    } else {
        println!("  {:<24}{}", name, line);
    }
}

/// Print a threshold outcome.
pub fn threshold(expr: &str, actual: f64, passed: bool) {
    if colors_enabled() {
        let mark = if passed { "✓".green() } else { "✗".red() };
        println!("  {} {}  {}", mark, expr, format!("actual {:.3}", actual).dimmed());
    } else {
        let mark = if passed { "✓" } else { "✗" };
        println!("  {} {}  actual {:.3}", mark, expr, actual);
    }
}
