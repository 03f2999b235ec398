//! Plotly loader: inject the Plotly bundle once and share the resulting handle.
//!
//! A failed load is never retried: the failed flight stays in the slot and
//! every later call gets the same error until the loader is dropped.

use futures::future::{self, FutureExt};
use std::sync::Arc;

use super::error::LoadError;
use super::host::{PageHost, ScriptTag};
use super::slot::{FailurePolicy, LoadState, SharedLoad, SingleFlight};

/// Bundle used when neither the page global nor the meta tag name one.
pub const DEFAULT_PLOTLY_URL: &str = "https://cdn.plot.ly/plotly-2.30.0.min.js";

/// `window` property that overrides the script URL.
pub const SCRIPT_URL_GLOBAL: &str = "__PlotlyScriptUrl";

/// `<meta name="plotly-src" content="...">` consulted after the global.
pub const SCRIPT_URL_META: &str = "plotly-src";

const LIBRARY: &str = "Plotly";

/// Page host that can report the `window.Plotly` global.
pub trait PlotlyHost: PageHost {
    type Plotly: Clone + Send + Sync + 'static;

    fn plotly(&self) -> Option<Self::Plotly>;
}

/// Script URL by precedence: non-empty global override, non-empty meta tag, `default_url`.
pub fn preferred_script_url<H: PageHost + ?Sized>(host: &H, default_url: &str) -> String {
    if let Some(url) = host
        .global_string(SCRIPT_URL_GLOBAL)
        .filter(|u| !u.is_empty())
    {
        return url;
    }
    if let Some(url) = host.meta_content(SCRIPT_URL_META).filter(|u| !u.is_empty()) {
        return url;
    }
    default_url.to_string()
}

pub struct PlotlyLoader<H: PlotlyHost> {
    host: Arc<H>,
    default_url: String,
    flight: SingleFlight<H::Plotly>,
}

impl<H: PlotlyHost> PlotlyLoader<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            default_url: DEFAULT_PLOTLY_URL.to_string(),
            flight: SingleFlight::new(FailurePolicy::Keep),
        }
    }

    pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
        self.default_url = url.into();
        self
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn state(&self) -> LoadState {
        self.flight.state()
    }

    /// Shared future of the Plotly handle.
    ///
    /// Outside a browser this fails immediately, and if the page already has
    /// `Plotly` it resolves immediately; neither case touches the cache.
    pub fn load(&self) -> SharedLoad<H::Plotly> {
        if !self.host.is_browser() {
            return future::ready(Err(LoadError::NotInBrowser { library: LIBRARY }))
                .boxed()
                .shared();
        }
        if let Some(plotly) = self.host.plotly() {
            return future::ready(Ok(plotly)).boxed().shared();
        }

        self.flight.get_or_start(|| {
            let host = Arc::clone(&self.host);
            let src = preferred_script_url(&*host, &self.default_url);
            tracing::info!("loading Plotly from {}", src);
            async move {
                host.inject_script(ScriptTag::new(src.as_str()))
                    .await
                    .map_err(|e| {
                        tracing::warn!("Plotly script failed: {}", e);
                        e
                    })?;
                match host.plotly() {
                    Some(plotly) => {
                        tracing::info!("Plotly loaded from {}", src);
                        Ok(plotly)
                    }
                    None => {
                        tracing::warn!("Plotly script {} loaded without exposing `Plotly`", src);
                        Err(LoadError::GlobalMissing {
                            global: LIBRARY,
                            src,
                        })
                    }
                }
            }
        })
    }
}
