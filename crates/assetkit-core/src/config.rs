use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::release::{CDN_PACKAGE, DEFAULT_VERSION};

/// Requests per asset while following redirects; a chain of this many redirects fails.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Global configuration loaded from `~/.config/assetkit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetkitConfig {
    /// RDKit.js release used when no version is given on the command line.
    #[serde(default = "default_version")]
    pub default_version: String,
    /// Package root on the CDN; `@<version>/dist/<file>` is appended.
    #[serde(default = "default_cdn_package")]
    pub cdn_package: String,
    /// Maximum number of requests per asset when following redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Optional output directory; when missing, `<package-root>/public/rdkit` is used.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_cdn_package() -> String {
    CDN_PACKAGE.to_string()
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

impl Default for AssetkitConfig {
    fn default() -> Self {
        Self {
            default_version: default_version(),
            cdn_package: default_cdn_package(),
            max_redirects: default_max_redirects(),
            output_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("assetkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AssetkitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AssetkitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AssetkitConfig = toml::from_str(&data)?;
    Ok(cfg)
}
