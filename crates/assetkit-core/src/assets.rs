//! RDKit.js asset fetcher: plan the release files, download them one after
//! another, and save each under the output directory.
//!
//! Any failing file aborts the run; files saved before the failure are kept
//! but the run as a whole is reported as failed.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::checksum;
use crate::config::DEFAULT_MAX_REDIRECTS;
use crate::fetch::fetch_buffer;
use crate::http::Transport;
use crate::release::{RdkitRelease, ASSET_FILES};
use crate::storage;

/// Marker file identifying the web package the assets are served from.
const PACKAGE_MANIFEST: &str = "package.json";

/// One file to download: consumed once by [`AssetFetcher::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub file_name: String,
    pub url: String,
    pub dest: PathBuf,
}

/// Report for one saved asset.
#[derive(Debug, Clone)]
pub struct SavedAsset {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the saved contents.
    pub sha256: String,
}

/// Progress notifications emitted by [`AssetFetcher::run`].
#[derive(Debug)]
pub enum Progress<'a> {
    Downloading(&'a DownloadTask),
    Saved(&'a SavedAsset),
}

/// One task per entry of [`ASSET_FILES`], in order.
pub fn plan(release: &RdkitRelease, out_dir: &Path) -> Vec<DownloadTask> {
    ASSET_FILES
        .iter()
        .map(|file| DownloadTask {
            file_name: file.to_string(),
            url: release.asset_url(file),
            dest: out_dir.join(file),
        })
        .collect()
}

/// Nearest ancestor of `start` (inclusive) that holds a `package.json`,
/// or `start` itself when there is none.
pub fn find_package_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(PACKAGE_MANIFEST).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// `<package-root>/public/rdkit`.
pub fn default_output_dir(start: &Path) -> PathBuf {
    find_package_root(start).join("public").join("rdkit")
}

/// Sequential downloader for a release's asset files.
pub struct AssetFetcher<T> {
    transport: T,
    out_dir: PathBuf,
    max_redirects: u32,
}

impl<T: Transport> AssetFetcher<T> {
    pub fn new(transport: T, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            out_dir: out_dir.into(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Fetch one task and write it to its destination.
    pub fn download(&self, task: &DownloadTask) -> Result<SavedAsset> {
        let buffer = fetch_buffer(&self.transport, &task.url, self.max_redirects)
            .with_context(|| format!("failed to download {}", task.file_name))?;
        storage::write_atomic(&task.dest, &buffer)
            .with_context(|| format!("failed to save {}", task.file_name))?;

        let saved = SavedAsset {
            file_name: task.file_name.clone(),
            path: task.dest.clone(),
            bytes: buffer.len() as u64,
            sha256: checksum::sha256_hex(&buffer),
        };
        tracing::info!(
            "saved {} ({} bytes, sha256 {}) to {}",
            saved.file_name,
            saved.bytes,
            saved.sha256,
            saved.path.display()
        );
        Ok(saved)
    }

    /// Download every asset of `release` in order. The first failure aborts the run.
    pub fn run<F>(&self, release: &RdkitRelease, mut progress: F) -> Result<Vec<SavedAsset>>
    where
        F: FnMut(Progress<'_>),
    {
        let tasks = plan(release, &self.out_dir);
        tracing::info!(
            "fetching {} RDKit.js {} assets into {}",
            tasks.len(),
            release.version(),
            self.out_dir.display()
        );

        let mut saved = Vec::with_capacity(tasks.len());
        for task in &tasks {
            tracing::info!("downloading {}", task.url);
            progress(Progress::Downloading(task));
            let asset = self.download(task).map_err(|e| {
                tracing::error!("{:#}", e);
                e
            })?;
            progress(Progress::Saved(&asset));
            saved.push(asset);
        }
        Ok(saved)
    }
}
