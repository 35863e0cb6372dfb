//! Terminal output
//!
//! `colored` honours NO_COLOR and CLICOLOR; `color = false` in settings
//! turns it off as well.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

/// Red "error:" line on stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Cyan summary line, e.g. "Found 2 root groups:".
pub fn found(count: usize, what: &str) {
    println!("{}", format!("Found {count} {what}:").cyan().bold());
}

/// Config file location, marked by whether it exists.
pub fn config_location(label: &str, path: &Path) {
    if path.exists() {
        println!("{} {label}: {}", "✓".green(), path.display());
    } else {
        println!("{} {label}: {} {}", "✗".red(), path.display(), "(not found)".dimmed());
    }
}

/// Uncolored output: rendered trees, JSON, TOML.
pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{msg}");
}
