//! RDKit.js release modeling: version → CDN base URL → per-file asset URLs.

mod location;

pub use location::resolve_location;

/// Release fetched when the caller does not name one.
pub const DEFAULT_VERSION: &str = "2024.3.5-1.0.0";

/// CDN package root; the version and `/dist/` are appended.
pub const CDN_PACKAGE: &str = "https://unpkg.com/@rdkit/rdkit";

/// Files making up a release, in download order: the loader script, then the wasm binary.
pub const ASSET_FILES: [&str; 2] = ["RDKit_minimal.js", "RDKit_minimal.wasm"];

/// A published RDKit.js release on the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdkitRelease {
    version: String,
    package_url: String,
}

impl RdkitRelease {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            package_url: CDN_PACKAGE.to_string(),
        }
    }

    /// Serve the release from a mirror laid out like unpkg (`<package_url>@<version>/dist/`).
    pub fn with_package_url(mut self, package_url: impl Into<String>) -> Self {
        self.package_url = package_url.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `https://unpkg.com/@rdkit/rdkit@<version>/dist/`
    pub fn base_url(&self) -> String {
        format!("{}@{}/dist/", self.package_url, self.version)
    }

    /// Base URL with `file_name` appended verbatim.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!("{}{}", self.base_url(), file_name)
    }

    /// URLs of every file in [`ASSET_FILES`], in order.
    pub fn asset_urls(&self) -> Vec<String> {
        ASSET_FILES.iter().map(|f| self.asset_url(f)).collect()
    }
}

impl Default for RdkitRelease {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}
