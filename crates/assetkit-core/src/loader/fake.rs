//! In-memory page host for loader tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::error::InitError;
use super::host::{PageHost, ScriptError, ScriptStatus, ScriptTag};
use super::plotly::PlotlyHost;
use super::rdkit::{FileLocator, RdkitHost, RdkitModule};

/// Stand-in for `window.Plotly`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakePlotly {
    pub from: String,
}

/// Stand-in for the object returned by `initRDKitModule`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeModule {
    pub base: String,
    pub functions: Vec<&'static str>,
}

impl FakeModule {
    pub fn complete(base: &str) -> Self {
        Self {
            base: base.to_string(),
            functions: vec!["get_mol", "get_qmol", "version"],
        }
    }

    pub fn without_get_mol(base: &str) -> Self {
        Self {
            base: base.to_string(),
            functions: vec!["version"],
        }
    }
}

impl RdkitModule for FakeModule {
    fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| *f == name)
    }
}

/// What happens when a script with a given `src` is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnLoad {
    /// `load` fires and nothing new appears on `window`.
    Nothing,
    /// `load` fires and `window.Plotly` is set.
    ExposePlotly,
    /// `load` fires and `window.initRDKitModule` is defined.
    DefineInitializer,
    /// `error` fires.
    Fail,
}

#[derive(Default)]
struct State {
    scripts: HashMap<String, ScriptStatus>,
    injected: Vec<ScriptTag>,
    plotly: Option<FakePlotly>,
    initializer: bool,
    init_calls: Vec<String>,
}

pub(crate) struct FakePage {
    browser: bool,
    globals: HashMap<String, String>,
    metas: HashMap<String, String>,
    on_load: HashMap<String, OnLoad>,
    pending_outcome: HashMap<String, OnLoad>,
    modules: HashMap<String, Result<FakeModule, String>>,
    state: Mutex<State>,
}

impl FakePage {
    pub fn browser() -> Self {
        Self {
            browser: true,
            globals: HashMap::new(),
            metas: HashMap::new(),
            on_load: HashMap::new(),
            pending_outcome: HashMap::new(),
            modules: HashMap::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn headless() -> Self {
        Self {
            browser: false,
            ..Self::browser()
        }
    }

    pub fn with_global(mut self, name: &str, value: &str) -> Self {
        self.globals.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.metas.insert(name.to_string(), content.to_string());
        self
    }

    pub fn on_load(mut self, src: &str, effect: OnLoad) -> Self {
        self.on_load.insert(src.to_string(), effect);
        self
    }

    /// A script tag already in the page; `Pending` ones settle with `outcome` when awaited.
    pub fn with_existing_script(self, src: &str, status: ScriptStatus, outcome: OnLoad) -> Self {
        let mut page = self;
        page.state().scripts.insert(src.to_string(), status);
        page.pending_outcome.insert(src.to_string(), outcome);
        page
    }

    pub fn with_plotly(self, from: &str) -> Self {
        self.state().plotly = Some(FakePlotly {
            from: from.to_string(),
        });
        self
    }

    pub fn with_initializer(self) -> Self {
        self.state().initializer = true;
        self
    }

    /// Module returned when initializing against `base`.
    pub fn module_for(mut self, base: &str, module: FakeModule) -> Self {
        self.modules.insert(base.to_string(), Ok(module));
        self
    }

    /// Initialization against `base` rejects with `reason`.
    pub fn init_fails(mut self, base: &str, reason: &str) -> Self {
        self.modules.insert(base.to_string(), Err(reason.to_string()));
        self
    }

    pub fn injected(&self) -> Vec<ScriptTag> {
        self.state().injected.clone()
    }

    pub fn injected_srcs(&self) -> Vec<String> {
        self.state().injected.iter().map(|t| t.src.clone()).collect()
    }

    pub fn init_calls(&self) -> Vec<String> {
        self.state().init_calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn settle(&self, src: &str, effect: OnLoad) -> Result<(), ScriptError> {
        let mut state = self.state();
        match effect {
            OnLoad::Fail => {
                state.scripts.remove(src);
                return Err(ScriptError::new(src, "error event"));
            }
            OnLoad::Nothing => {}
            OnLoad::ExposePlotly => {
                state.plotly = Some(FakePlotly {
                    from: src.to_string(),
                })
            }
            OnLoad::DefineInitializer => state.initializer = true,
        }
        state.scripts.insert(src.to_string(), ScriptStatus::Loaded);
        Ok(())
    }
}

#[async_trait]
impl PageHost for FakePage {
    fn is_browser(&self) -> bool {
        self.browser
    }

    fn global_string(&self, name: &str) -> Option<String> {
        self.globals.get(name).cloned()
    }

    fn meta_content(&self, name: &str) -> Option<String> {
        self.metas.get(name).cloned()
    }

    fn script_status(&self, src: &str) -> Option<ScriptStatus> {
        self.state().scripts.get(src).copied()
    }

    async fn wait_for_script(&self, src: &str) -> Result<(), ScriptError> {
        let outcome = self
            .pending_outcome
            .get(src)
            .copied()
            .unwrap_or(OnLoad::Fail);
        self.settle(src, outcome)
    }

    async fn inject_script(&self, tag: ScriptTag) -> Result<(), ScriptError> {
        let effect = self.on_load.get(&tag.src).copied().unwrap_or(OnLoad::Fail);
        {
            let mut state = self.state();
            state
                .scripts
                .insert(tag.src.clone(), ScriptStatus::Pending);
            state.injected.push(tag.clone());
        }
        tokio::task::yield_now().await;
        self.settle(&tag.src, effect)
    }
}

impl PlotlyHost for FakePage {
    type Plotly = FakePlotly;

    fn plotly(&self) -> Option<FakePlotly> {
        self.state().plotly.clone()
    }
}

#[async_trait]
impl RdkitHost for FakePage {
    type Module = FakeModule;

    fn has_initializer(&self) -> bool {
        self.state().initializer
    }

    async fn initialize(&self, locator: FileLocator) -> Result<FakeModule, InitError> {
        self.state().init_calls.push(locator.base().to_string());
        tokio::task::yield_now().await;
        match self.modules.get(locator.base()) {
            Some(Ok(module)) => Ok(module.clone()),
            Some(Err(reason)) => Err(InitError::new(reason.clone())),
            None => Err(InitError::new(format!(
                "could not fetch {}",
                locator.locate("RDKit_minimal.wasm")
            ))),
        }
    }
}
