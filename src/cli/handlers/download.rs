use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::Settings;
use crate::context::TenantDirectory;
use crate::download::DownloadPackage;
use crate::provider::{format_size, FileLogProvider};

pub async fn handle_download_command(
    config: Option<PathBuf>,
    file: String,
    domain: String,
    service: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let ctx = settings.request_context()?;
    let tenant_id = settings.tenant_id(&domain)?;
    let provider = FileLogProvider::new(
        ctx,
        settings.logs.clone(),
        settings.syslog.clone(),
        settings,
    );

    let mut stream = provider
        .open_stream(&file, tenant_id, service.as_deref())
        .await
        .context("cannot open log stream")?;

    let progress = match stream.len_hint() {
        Some(total) => ProgressBar::new(total).with_style(
            ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes}")
                .expect("progress template is valid"),
        ),
        None => ProgressBar::new_spinner().with_message(stream.name().to_string()),
    };

    let file_name = stream.name().to_string();
    let mut data = Vec::new();
    while let Some(chunk) = stream.chunk().await.context("cannot read log stream")? {
        progress.inc(chunk.len() as u64);
        data.extend_from_slice(&chunk);
    }
    progress.finish_and_clear();

    let package = DownloadPackage::new(file_name, data);
    let target = output.unwrap_or_else(|| PathBuf::from(&package.file_name));
    let mut out = tokio::fs::File::create(&target)
        .await
        .with_context(|| format!("cannot create {}", target.display()))?;
    out.write_all(&package.data).await?;
    out.flush().await?;

    info!(
        "downloaded {} ({}) to {}",
        package.file_name,
        format_size(package.len() as u64),
        target.display()
    );
    Ok(())
}
