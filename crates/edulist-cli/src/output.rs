//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use edulist_core::FacetSet;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a status line to stderr.
pub fn status(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Tell the user a successful load matched nothing.
pub fn no_results() {
    eprintln!("{}", "No results matched your filters".yellow());
}

/// Print the filter values found in the loaded items.
pub fn facets(category: &str, secondary: Option<&str>, set: &FacetSet) {
    println!();
    field(category, &list_or_none(&set.category));
    if let Some(secondary) = secondary {
        field(secondary, &list_or_none(&set.secondary));
    }
    if !set.complete {
        status("(from loaded pages only; more values may exist)");
    }
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}
