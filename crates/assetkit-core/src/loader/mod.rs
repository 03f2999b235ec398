//! Lazy page-script loaders with process-wide single-flight caching.
//!
//! Each loader owns one [`SingleFlight`] slot. Callers arriving while a load
//! is in flight get a clone of the same [`SharedLoad`] future, so the script
//! is injected once no matter how many callers ask. The browser is reached
//! only through the [`PageHost`] traits; no ambient globals are touched.
//!
//! The two loaders deliberately differ on failure: a failed Plotly load stays
//! cached for the life of the loader, a failed RDKit load clears its slot so
//! the next call starts over.

mod error;
mod host;
pub mod plotly;
pub mod rdkit;
mod slot;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{CandidateFailure, InitError, LoadError};
pub use host::{PageHost, ScriptError, ScriptParent, ScriptStatus, ScriptTag};
pub use plotly::{PlotlyHost, PlotlyLoader};
pub use rdkit::{FileLocator, RdkitHost, RdkitLoader, RdkitModule};
pub use slot::{FailurePolicy, LoadState, SharedLoad, SingleFlight};
