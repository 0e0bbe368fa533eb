use crate::providers::util::ensure_success;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, Response, Url};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Downloads the daily CAFCI quote spreadsheet.
pub struct CafciDownloader {
    base_url: String,
    client: Client,
}

impl CafciDownloader {
    pub fn new(base_url: &str, client: Client) -> Self {
        CafciDownloader {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Streams the spreadsheet to `dest` and returns the number of bytes written.
    #[instrument(skip_all)]
    pub async fn download<P: AsRef<Path>>(&self, dest: P) -> Result<u64> {
        let dest = dest.as_ref();
        let timestamp = Utc::now().timestamp().to_string();
        let url = Url::parse_with_params(&format!("{}/pb_get", self.base_url), &[("d", timestamp)])
            .context("Invalid CAFCI base URL")?;
        debug!("Requesting spreadsheet from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        let mut response = ensure_success(response)?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let partial = partial_path(dest);
        let written = match stream_to(&mut response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, dest)
            .await
            .with_context(|| format!("Failed to move download to {}", dest.display()))?;

        info!("Downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

/// Sibling path the body is streamed to, so a failed download never
/// truncates the workbook already at `dest`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to(response: &mut Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read spreadsheet response")?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
