//! The page a loader runs in: script injection, globals, and `<meta>` lookups.

use async_trait::async_trait;
use thiserror::Error;

/// Where an injected `<script>` is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptParent {
    Head,
    Body,
}

/// A `<script>` element to append to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub is_async: bool,
    pub cross_origin: Option<String>,
    pub parent: ScriptParent,
}

impl ScriptTag {
    /// Async script appended to `<head>`.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            is_async: true,
            cross_origin: None,
            parent: ScriptParent::Head,
        }
    }

    pub fn cross_origin(mut self, value: impl Into<String>) -> Self {
        self.cross_origin = Some(value.into());
        self
    }

    pub fn in_body(mut self) -> Self {
        self.parent = ScriptParent::Body;
        self
    }
}

/// State of a `<script>` already present in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// Inserted but neither `load` nor `error` has fired yet.
    Pending,
    /// `load` fired.
    Loaded,
}

/// The script's `error` event fired (network failure, CSP, 404...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load script {src}: {reason}")]
pub struct ScriptError {
    pub src: String,
    pub reason: String,
}

impl ScriptError {
    pub fn new(src: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            reason: reason.into(),
        }
    }
}

/// Browser-like page the loaders operate on.
///
/// Implementations own whatever binding reaches the real `window` and
/// `document`; the loaders never read global state directly.
#[async_trait]
pub trait PageHost: Send + Sync + 'static {
    /// False outside a browser-like environment (server rendering, native tools).
    fn is_browser(&self) -> bool;

    /// A string-valued `window` property, if set.
    fn global_string(&self, name: &str) -> Option<String>;

    /// `content` of `<meta name="...">`, if present.
    fn meta_content(&self, name: &str) -> Option<String>;

    /// Status of a script already in the page with exactly this `src`.
    fn script_status(&self, src: &str) -> Option<ScriptStatus>;

    /// Wait for an existing script's `load` (Ok) or `error` (Err) event.
    async fn wait_for_script(&self, src: &str) -> Result<(), ScriptError>;

    /// Append `tag` and wait for its `load` (Ok) or `error` (Err) event.
    async fn inject_script(&self, tag: ScriptTag) -> Result<(), ScriptError>;
}
