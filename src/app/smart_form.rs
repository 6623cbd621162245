use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::{
    domain::{FormConfig, FormMode, FormValues, normalize_config},
    form::{FormConfigurator, FormSession},
    registry::ObjectTypeRegistry,
};

use super::{
    options::UiOptions,
    runtime::{App, ConfigureScreen, FormScreen, Screen, SessionOutcome},
};

/// Terminal front end for a smart object form.
///
/// ```no_run
/// use serde_json::json;
/// use smartform::{FormMode, SmartFormUI};
///
/// let outcome = SmartFormUI::new(&json!({"fields": {"name": {"type": "string"}}}))
///     .with_mode(FormMode::Edit)
///     .with_title("Profile")
///     .run()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct SmartFormUI {
    config: FormConfig,
    values: FormValues,
    mode: FormMode,
    registry: Arc<ObjectTypeRegistry>,
    title: Option<String>,
    options: UiOptions,
}

impl SmartFormUI {
    /// Form over a raw `{"fields": {...}}` document, normalized on the way in.
    pub fn new(raw_config: &Value) -> Self {
        Self::from_config(normalize_config(raw_config))
    }

    pub fn from_config(config: FormConfig) -> Self {
        Self {
            config,
            values: FormValues::new(),
            mode: FormMode::Edit,
            registry: Arc::new(ObjectTypeRegistry::builtin()),
            title: None,
            options: UiOptions::default(),
        }
    }

    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn with_mode(mut self, mode: FormMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_registry(mut self, registry: Arc<ObjectTypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the session until the user quits.
    ///
    /// Edit and configure sessions return the last saved values or config and
    /// fail when the user leaves without saving. View sessions always close
    /// with [`SessionOutcome::Closed`].
    pub fn run(self) -> Result<SessionOutcome> {
        let title = self.title.clone().unwrap_or_else(|| "Smart Form".to_string());
        tracing::info!(mode = %self.mode, fields = self.config.len(), "starting form session");
        let screen = self.build_screen();
        App::new(title, screen, self.options).run()
    }

    fn build_screen(&self) -> Screen {
        let context = self.options.render_context();
        match self.mode {
            FormMode::Configure => Screen::Configure(ConfigureScreen::new(
                FormConfigurator::new(&self.config),
                Arc::clone(&self.registry),
                context,
                Arc::clone(&self.options.icons),
            )),
            mode => {
                let session =
                    FormSession::from_config(Arc::clone(&self.registry), &self.config, mode)
                        .with_initial_values(self.values.clone());
                Screen::Form(FormScreen::new(session, context))
            }
        }
    }
}
