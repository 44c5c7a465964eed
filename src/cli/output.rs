//! Status lines printed around a report.
//!
//! Report bytes own stdout, so everything here goes to stderr.

use colored::*;

/// Display a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Display an info message, only when verbose
pub fn info(verbose: u8, message: &str) {
    if verbose > 0 {
        eprintln!("{} {}", "●".blue(), message);
    }
}

/// Banner for commands kept only for compatibility
pub fn deprecated(command: &str, replacement: &str) {
    eprintln!(
        "{} The '{}' command is deprecated and will be removed in a future release. Use '{}' instead.",
        "⚠".yellow(),
        command.bold(),
        replacement.bold()
    );
}

/// Whether stdout can take ANSI styling
pub fn stdout_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}
