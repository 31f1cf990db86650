use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::cli::commands::IndexFormat;
use crate::cli::utils::print_index_table;
use crate::config::Settings;
use crate::provider::{FileLogProvider, LogFileProvider, SourceMode};

pub async fn handle_list_command(
    config: Option<PathBuf>,
    domain: String,
    server_key: String,
    format: IndexFormat,
) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let ctx = settings.request_context()?;
    let provider = FileLogProvider::new(
        ctx,
        settings.logs.clone(),
        settings.syslog.clone(),
        settings,
    );

    match provider.source_mode() {
        SourceMode::Remote => info!("listing logs from the aggregation server"),
        SourceMode::Local => info!("listing logs from the local log directory"),
    }

    let entries = provider
        .log_index(&domain, &server_key)
        .await
        .context("cannot resolve log index")?;

    match format {
        IndexFormat::Table => print_index_table(&entries),
        IndexFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}
