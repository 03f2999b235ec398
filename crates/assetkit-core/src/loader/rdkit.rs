//! RDKit.js loader: walk the CDN candidates until one yields a usable module.
//!
//! For each base URL the loader first tries an already-present
//! `initRDKitModule`, then loads `RDKit_minimal.js` from that base and
//! initializes again. A module only counts if it exposes `get_mol`.
//! When every candidate fails the slot is cleared, so a later call retries
//! all candidates from the top.

use async_trait::async_trait;
use futures::future::{self, FutureExt};
use std::sync::Arc;

use super::error::{CandidateFailure, InitError, LoadError};
use super::host::{PageHost, ScriptError, ScriptStatus, ScriptTag};
use super::slot::{FailurePolicy, LoadState, SharedLoad, SingleFlight};

/// Base URLs tried in order; each holds `RDKit_minimal.js` and `RDKit_minimal.wasm`.
pub const CDN_CANDIDATES: [&str; 3] = [
    "https://unpkg.com/@rdkit/rdkit/dist/",
    "https://cdn.jsdelivr.net/npm/@rdkit/rdkit/dist/",
    "https://unpkg.com/@rdkit/rdkit@2024.3.5-1.0.0/dist/",
];

pub const RDKIT_SCRIPT: &str = "RDKit_minimal.js";

/// Function a module must expose to be accepted.
pub const REQUIRED_CAPABILITY: &str = "get_mol";

const LIBRARY: &str = "RDKit.js";

/// Maps files requested by the initializer (the `.wasm`, mostly) onto one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocator {
    base: String,
}

impl FileLocator {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn locate(&self, file: &str) -> String {
        format!("{}{}", self.base, file)
    }
}

/// Handle returned by `initRDKitModule`.
pub trait RdkitModule {
    fn has_function(&self, name: &str) -> bool;
}

/// Page host that can run `window.initRDKitModule`.
#[async_trait]
pub trait RdkitHost: PageHost {
    type Module: RdkitModule + Clone + Send + Sync + 'static;

    /// True when `window.initRDKitModule` is a function.
    fn has_initializer(&self) -> bool;

    /// `initRDKitModule({ locateFile })` with `locateFile` backed by `locator`.
    async fn initialize(&self, locator: FileLocator) -> Result<Self::Module, InitError>;
}

pub struct RdkitLoader<H: RdkitHost> {
    host: Arc<H>,
    candidates: Vec<String>,
    flight: SingleFlight<H::Module>,
}

impl<H: RdkitHost> RdkitLoader<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            candidates: CDN_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            flight: SingleFlight::new(FailurePolicy::Clear),
        }
    }

    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn state(&self) -> LoadState {
        self.flight.state()
    }

    /// Shared future of the RDKit module. Fails immediately outside a browser.
    pub fn load(&self) -> SharedLoad<H::Module> {
        if !self.host.is_browser() {
            return future::ready(Err(LoadError::NotInBrowser { library: LIBRARY }))
                .boxed()
                .shared();
        }

        self.flight.get_or_start(|| {
            load_from_candidates(Arc::clone(&self.host), self.candidates.clone())
        })
    }
}

async fn load_from_candidates<H: RdkitHost>(
    host: Arc<H>,
    candidates: Vec<String>,
) -> Result<H::Module, LoadError> {
    let mut failures = Vec::with_capacity(candidates.len());

    for base in candidates {
        tracing::info!("attempting to load RDKit from {}", base);
        let error = match init_from_base(&*host, &base).await {
            Ok(module) if module.has_function(REQUIRED_CAPABILITY) => {
                tracing::info!("RDKit.js loaded from {}", base);
                return Ok(module);
            }
            Ok(_) => LoadError::InvalidModule {
                base: base.clone(),
                capability: REQUIRED_CAPABILITY,
            },
            Err(e) => e,
        };
        tracing::warn!("failed to initialize RDKit from {}: {}", base, error);
        failures.push(CandidateFailure {
            base,
            error: Box::new(error),
        });
    }

    tracing::error!(
        "RDKit.js could not be loaded from any of {} CDN candidates",
        failures.len()
    );
    Err(LoadError::AllCandidatesFailed { failures })
}

async fn init_from_base<H: RdkitHost>(host: &H, base: &str) -> Result<H::Module, LoadError> {
    let locator = FileLocator::new(base);
    let script_url = locator.locate(RDKIT_SCRIPT);

    if host.has_initializer() {
        match host.initialize(locator.clone()).await {
            Ok(module) => return Ok(module),
            Err(e) => tracing::warn!(
                "initRDKitModule present but initialization failed for base {}: {}",
                base,
                e
            ),
        }
    }

    load_script(host, &script_url).await?;

    if !host.has_initializer() {
        return Err(LoadError::InitializerMissing { script_url });
    }

    host.initialize(locator)
        .await
        .map_err(|source| LoadError::Initialize {
            base: base.to_string(),
            source,
        })
}

/// Reuse a script tag already in the page, otherwise append a new one to `<body>`.
async fn load_script<H: PageHost>(host: &H, src: &str) -> Result<(), ScriptError> {
    match host.script_status(src) {
        Some(ScriptStatus::Loaded) => Ok(()),
        Some(ScriptStatus::Pending) => host.wait_for_script(src).await,
        None => {
            host.inject_script(ScriptTag::new(src).cross_origin("anonymous").in_body())
                .await
        }
    }
}
