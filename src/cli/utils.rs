use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::provider::LogEntry;

pub fn init_logging(verbose: bool, log_format: &str) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let fmt_layer = if log_format == "json" {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .expect("Failed to initialize tracing subscriber");
}

pub fn print_info() {
    println!("logvault v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("For more information, visit: {}", env!("CARGO_PKG_REPOSITORY"));
}

/// Print a resolved log index as an aligned terminal table.
pub fn print_index_table(entries: &[LogEntry]) {
    let name_width = entries
        .iter()
        .map(|e| e.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(4);
    let date_width = entries
        .iter()
        .map(|e| e.date.len())
        .chain(std::iter::once("DATE".len()))
        .max()
        .unwrap_or(4);

    // Pad before colouring so escape codes do not skew the columns.
    println!(
        "{}  {}  {}",
        format!("{:<name_width$}", "NAME").bold(),
        format!("{:<date_width$}", "DATE").bold(),
        "SIZE".bold()
    );
    for entry in entries {
        println!(
            "{:<name_width$}  {:<date_width$}  {}",
            entry.name, entry.date, entry.size
        );
    }
}
