//! Terminal output utilities
//!
//! All console styling lives here; callers hand over plain text and never
//! touch color codes themselves.

use console::style;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Echo a command argument vector, dimmed like build-log chatter
pub fn print_command(args: &[String]) {
    println!("{}", style(format!("{:?}", args)).black().bright());
}

/// Close a fixture progress line with a green OK tag
pub fn print_status_ok() {
    println!("{}", style("[ OK ]").green().bold());
}

/// Close a fixture progress line with a red FAIL tag
pub fn print_status_fail() {
    println!("{}", style("[FAIL]").red().bold());
}
