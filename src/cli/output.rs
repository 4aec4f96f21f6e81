//! Shared CLI output helpers for consistent terminal output.
//!
//! Colors go through `console`, which already respects NO_COLOR and
//! non-tty output.

use std::fmt::Display;

use console::style;

/// Print a success message with checkmark (green).
///
/// Example: `✓ support charts deployed`
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print an error message to stderr (red).
///
/// Example: `✗ cluster config not found`
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red(), msg);
}

/// Print a progress step (bold).
///
/// Example: `▸ Provisioning cert-manager...`
pub fn step(msg: &str) {
    println!("{} {}", style("▸").cyan(), style(msg).bold());
}

/// Print a hint message (cyan).
///
/// Example: `→ check the cluster name and --config-dir`
pub fn hint(msg: &str) {
    println!("{} {}", style("→").cyan(), style(msg).cyan());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  provider:    gcp`
pub fn kv(label: &str, value: impl Display) {
    println!("  {:<12} {}", style(format!("{label}:")).dim(), style(value).bold());
}
