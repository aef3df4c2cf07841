//! Output formatting utilities.

use serde::Serialize;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints a two-column table header.
pub fn print_table_header(left: &str, right: &str) {
    println!("{:<64}  {}", left, right);
    println!("{}", "-".repeat(80));
}

/// Formats a digest and a label as a table row.
pub fn format_table_row(digest: &str, label: &str) -> String {
    format!("{:<64}  {}", digest, label)
}

/// Renders a yes/no flag.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
