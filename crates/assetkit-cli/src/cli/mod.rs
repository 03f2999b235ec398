//! CLI for the RDKit.js asset fetcher.

use anyhow::{Context, Result};
use assetkit_core::assets::{self, AssetFetcher, Progress};
use assetkit_core::config;
use assetkit_core::http::CurlTransport;
use assetkit_core::release::RdkitRelease;
use clap::Parser;
use std::path::PathBuf;

const USER_AGENT: &str = concat!("fetch-rdkit-assets/", env!("CARGO_PKG_VERSION"));

/// Download the RDKit.js script and wasm module into `<package-root>/public/rdkit`.
#[derive(Debug, Parser)]
#[command(name = "fetch-rdkit-assets")]
#[command(about = "Download RDKit.js release assets from the CDN", long_about = None)]
pub struct Cli {
    /// RDKit.js release version, e.g. 2024.3.5-1.0.0 (defaults to the configured version).
    pub version: Option<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init().context("failed to load config")?;
        tracing::debug!("loaded config: {:?}", cfg);

        let release = RdkitRelease::new(self.version.unwrap_or(cfg.default_version))
            .with_package_url(cfg.cdn_package);
        let out_dir = output_dir(cfg.output_dir)?;

        let transport = CurlTransport::new().with_user_agent(USER_AGENT);
        let fetcher = AssetFetcher::new(transport, out_dir)
            .with_max_redirects(cfg.max_redirects);
        fetcher
            .run(&release, |progress| match progress {
                Progress::Downloading(task) => println!("Downloading {}", task.url),
                Progress::Saved(asset) => {
                    println!("Saved {} ({} bytes)", asset.file_name, asset.bytes)
                }
            })
            .context("Failed to fetch RDKit assets")?;

        println!("RDKit assets downloaded to {}", fetcher.out_dir().display());
        Ok(())
    }
}

fn output_dir(configured: Option<PathBuf>) -> Result<PathBuf> {
    match configured {
        Some(dir) => Ok(dir),
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            Ok(assets::default_output_dir(&cwd))
        }
    }
}
