//! HTTP client for the chart portal.

use std::path::{Path, PathBuf};

use reqwest::{Client, Response, Url};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use super::{december_files, file_name_from_url, year_folders};

/// Scraping and download errors.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL has no file name: {0}")]
    NoFileName(String),
}

/// Suffix of an archive still being downloaded.
pub const PARTIAL_SUFFIX: &str = ".part";

async fn stream_to_file(mut response: Response, path: &Path) -> Result<(), ScrapeError> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Thin wrapper around a reqwest client that knows the portal layout.
#[derive(Debug, Clone, Default)]
pub struct IceClient {
    client: Client,
}

impl IceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit reqwest client (timeouts, proxies).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// List the year folder links of the base listing.
    pub async fn list_year_folders(&self, base_url: &str) -> Result<Vec<String>, ScrapeError> {
        let html = self.get_text(base_url).await?;
        Ok(year_folders(&html))
    }

    /// List the December archive links of one year folder.
    pub async fn scrape_folder(&self, folder_url: &str) -> Result<Vec<String>, ScrapeError> {
        let html = self.get_text(folder_url).await?;
        Ok(december_files(&html))
    }

    /// Stream `file_url` into `download_dir`, named after the last URL segment.
    ///
    /// The body is written to a `.part` file that only takes the final name once
    /// complete; a failed transfer leaves nothing under the final name.
    pub async fn download_file(
        &self,
        file_url: &str,
        download_dir: &Path,
    ) -> Result<PathBuf, ScrapeError> {
        let name = file_name_from_url(file_url);
        if name.is_empty() {
            return Err(ScrapeError::NoFileName(file_url.to_string()));
        }
        let local = download_dir.join(name);
        let partial = download_dir.join(format!("{name}{PARTIAL_SUFFIX}"));

        let response = self.client.get(file_url).send().await?.error_for_status()?;
        if let Err(e) = stream_to_file(response, &partial).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::warn!("Could not remove {}: {}", partial.display(), cleanup);
            }
            return Err(e);
        }
        tokio::fs::rename(&partial, &local).await?;

        tracing::info!("Downloaded: {}", local.display());
        Ok(local)
    }

    /// Walk every year folder under `base_url` and download its December archives.
    ///
    /// With `skip_existing`, archives already present in `download_dir` are not
    /// fetched again. Returns the local paths of all selected archives.
    pub async fn scrape_and_download(
        &self,
        base_url: &str,
        download_dir: &Path,
        skip_existing: bool,
    ) -> Result<Vec<PathBuf>, ScrapeError> {
        tokio::fs::create_dir_all(download_dir).await?;

        let base = Url::parse(base_url)?;
        let folders = self.list_year_folders(base.as_str()).await?;
        tracing::info!("Found {} year folders.", folders.len());

        let mut written = Vec::new();
        for folder in folders {
            let year_url = base.join(&folder)?;
            tracing::info!("Checking folder: {}", year_url);

            for file in self.scrape_folder(year_url.as_str()).await? {
                let file_url = year_url.join(&file)?;
                let local = download_dir.join(file_name_from_url(file_url.as_str()));

                if skip_existing && tokio::fs::try_exists(&local).await? {
                    tracing::debug!("Already downloaded: {}", local.display());
                    written.push(local);
                    continue;
                }

                written.push(self.download_file(file_url.as_str(), download_dir).await?);
            }
        }

        Ok(written)
    }
}
