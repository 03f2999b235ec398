//! Loader errors. `Clone` so every holder of a shared flight gets its own copy.

use thiserror::Error;

use super::host::ScriptError;

/// Failure reported by an RDKit module initializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InitError {
    pub reason: String,
}

impl InitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why one RDKit candidate base URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub base: String,
    pub error: Box<LoadError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("{library} can only be loaded in a browser page")]
    NotInBrowser { library: &'static str },

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("script {src} loaded but `{global}` was not exposed globally")]
    GlobalMissing { global: &'static str, src: String },

    #[error("initRDKitModule not found after loading {script_url}")]
    InitializerMissing { script_url: String },

    #[error("RDKit initialization from {base} failed: {source}")]
    Initialize {
        base: String,
        #[source]
        source: InitError,
    },

    #[error("invalid module from {base}: `{capability}` is not a function")]
    InvalidModule {
        base: String,
        capability: &'static str,
    },

    #[error("failed to load the RDKit.js library from {} CDN candidates", .failures.len())]
    AllCandidatesFailed { failures: Vec<CandidateFailure> },
}

impl LoadError {
    /// Per-candidate errors, in candidate order, for an aggregated failure; empty otherwise.
    pub fn failures(&self) -> &[CandidateFailure] {
        match self {
            LoadError::AllCandidatesFailed { failures } => failures,
            _ => &[],
        }
    }
}
