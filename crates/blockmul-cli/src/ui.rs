//! UI helpers for CLI display.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// Status cell for one row of the comparison table.
#[must_use]
pub fn status_label(ok: bool) -> String {
    let label = if ok { "OK" } else { "ERROR" };
    if is_color_disabled() {
        format!("[{label}]")
    } else if ok {
        style(format!("[{label}]")).green().to_string()
    } else {
        style(format!("[{label}]")).red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_functions_do_not_panic() {
        print_header("Block multiplication");
        print_success("products agree");
        print_error("products differ");
        print_header("");
    }

    #[test]
    fn status_label_names_outcome() {
        assert!(status_label(true).contains("OK"));
        assert!(status_label(false).contains("ERROR"));
    }
}
