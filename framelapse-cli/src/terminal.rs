// ============================================================================
// framelapse-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: section headers and aligned status lines on stdout.
//
// console::style drops its escape codes on its own when stdout is not a
// terminal, so piped output stays plain.

use console::style;

const LABEL_WIDTH: usize = 15;
const STATUS_INDENT: &str = "  ";

/// Prints an uppercase section header preceded by a blank line.
pub fn print_section(title: &str) {
    println!();
    println!("===== {} =====", style(title.to_uppercase()).cyan().bold());
    println!();
}

/// Prints `label: value` with the value column aligned.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    println!("{}", format_status(label, value, highlight));
}

pub fn print_success(message: &str) {
    println!("{STATUS_INDENT}{} {message}", style("✓").green());
}

fn format_status(label: &str, value: &str, highlight: bool) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.len()).max(1);
    let value = if highlight {
        style(value).bold().to_string()
    } else {
        value.to_string()
    };
    format!("{STATUS_INDENT}{label}:{}{value}", " ".repeat(padding))
}
