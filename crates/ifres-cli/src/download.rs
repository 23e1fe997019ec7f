use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

#[derive(Debug, Clone, Copy)]
pub enum DownloadProgress {
    Started { total_size: Option<u64> },
    Downloading { downloaded: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Fetches mmCIF files from the RCSB PDB archive.
#[derive(Debug)]
pub struct StructureDownloader {
    base_url: String,
    client: reqwest::Client,
}

impl StructureDownloader {
    pub fn new() -> Self {
        Self::with_base_url(RCSB_DOWNLOAD_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Checks that `pdb_id` is a four-character alphanumeric code and upper-cases it.
    pub fn normalize_id(pdb_id: &str) -> Result<String> {
        let id = pdb_id.trim();
        if id.len() != 4 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CliError::Argument(format!(
                "'{}' is not a valid PDB identifier (expected 4 alphanumeric characters)",
                pdb_id
            )));
        }
        Ok(id.to_ascii_uppercase())
    }

    pub fn url_for(&self, id: &str) -> String {
        format!("{}/{}.cif", self.base_url, id)
    }

    pub fn target_path(output_dir: &Path, id: &str) -> PathBuf {
        output_dir.join(format!("{}.cif", id))
    }

    /// Downloads `{id}.cif` into `output_dir`. Without `force`, an existing file is kept
    /// and no request is made.
    pub async fn download(
        &self,
        pdb_id: &str,
        output_dir: &Path,
        force: bool,
        mut progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<DownloadOutcome> {
        let id = Self::normalize_id(pdb_id)?;
        let path = Self::target_path(output_dir, &id);
        if path.exists() && !force {
            info!("{:?} already exists, skipping download.", &path);
            return Ok(DownloadOutcome::AlreadyPresent(path));
        }
        tokio::fs::create_dir_all(output_dir).await?;

        let url = self.url_for(&id);
        info!("Sending request to {}", url);
        let mut response = self.client.get(&url).send().await?.error_for_status()?;

        let total_size = response.content_length();
        progress_callback(DownloadProgress::Started { total_size });

        let mut downloaded: u64 = 0;
        let mut buffer: Vec<u8> = Vec::with_capacity(total_size.unwrap_or(0) as usize);
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
            downloaded += chunk.len() as u64;
            progress_callback(DownloadProgress::Downloading { downloaded });
        }

        tokio::fs::write(&path, &buffer).await?;
        debug!(bytes = downloaded, "Wrote {:?}", &path);
        Ok(DownloadOutcome::Downloaded(path))
    }
}
