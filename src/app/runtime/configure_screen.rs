use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    domain::{FormConfig, Validation},
    form::{FieldConfigPatch, FieldNameError, FormConfigurator},
    presentation::{ConfigureFocus, ConfigureRender, IconSet, MetaRow, PanelRender},
    registry::{FieldConfigure, ObjectTypeRegistry},
    types::{RenderContext, handle_text_edit},
};

use super::super::keymap::KeymapContext;

/// What a grab key press did in the field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GrabOutcome {
    Started(String),
    Dropped(String, usize),
    Cancelled,
    Nothing,
}

/// Configure session: the configurator plus the add-field draft, the list
/// selection and the detail panel editors.
pub(crate) struct ConfigureScreen {
    configurator: FormConfigurator,
    initial: FormConfig,
    registry: Arc<ObjectTypeRegistry>,
    context: RenderContext,
    icons: Arc<IconSet>,
    type_names: Vec<String>,
    focus: ConfigureFocus,
    draft_name: String,
    draft_type: usize,
    selected: usize,
    row: MetaRow,
    type_configure: Option<(String, Box<dyn FieldConfigure>)>,
}

impl ConfigureScreen {
    pub fn new(
        configurator: FormConfigurator,
        registry: Arc<ObjectTypeRegistry>,
        context: RenderContext,
        icons: Arc<IconSet>,
    ) -> Self {
        let type_names = registry.type_names();
        let initial = configurator.config().clone();
        let mut screen = Self {
            configurator,
            initial,
            registry,
            context,
            icons,
            type_names,
            focus: ConfigureFocus::NewName,
            draft_name: String::new(),
            draft_type: 0,
            selected: 0,
            row: MetaRow::Label,
            type_configure: None,
        };
        screen.sync_panel();
        screen
    }

    pub fn config(&self) -> &FormConfig {
        self.configurator.config()
    }

    pub fn focus(&self) -> ConfigureFocus {
        self.focus
    }

    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    pub fn draft_type(&self) -> &str {
        self.type_names
            .get(self.draft_type)
            .map(String::as_str)
            .unwrap_or(crate::domain::DEFAULT_TYPE)
    }

    pub fn is_dirty(&self) -> bool {
        self.configurator.config() != &self.initial
    }

    pub fn error_count(&self) -> usize {
        self.configurator.field_errors().len()
    }

    pub fn keymap_contexts(&self) -> [KeymapContext; 2] {
        let area = match self.focus {
            ConfigureFocus::NewName | ConfigureFocus::NewType => KeymapContext::NewField,
            ConfigureFocus::Fields => KeymapContext::Fields,
            ConfigureFocus::Meta | ConfigureFocus::TypeConfig => KeymapContext::Panel,
        };
        [KeymapContext::Configure, area]
    }

    pub fn selected_field(&self) -> Option<String> {
        self.configurator
            .config()
            .sorted_fields()
            .get(self.selected)
            .map(|(name, _)| name.to_string())
    }

    pub fn step_focus(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let mut next = self.focus.cycle(delta as isize);
        if self.selected_field().is_none() {
            while matches!(next, ConfigureFocus::Meta | ConfigureFocus::TypeConfig) {
                next = next.cycle(delta.signum() as isize);
            }
        }
        self.focus = next;
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
    }

    pub fn set_draft_type(&mut self, idx: usize) {
        if idx < self.type_names.len() {
            self.draft_type = idx;
        }
    }

    /// Add the drafted field. On success the draft is cleared and the new
    /// field selected.
    pub fn add_field(&mut self) -> Result<String, FieldNameError> {
        let name = self.draft_name.clone();
        let type_name = self.draft_type().to_string();
        if !self.configurator.add_field(&name, &type_name) {
            return Err(self
                .configurator
                .field_error(&name)
                .unwrap_or(FieldNameError::Empty));
        }
        self.draft_name.clear();
        self.selected = self.configurator.config().len().saturating_sub(1);
        self.sync_panel();
        Ok(name)
    }

    pub fn remove_selected(&mut self) -> Option<String> {
        let name = self.selected_field()?;
        if !self.configurator.remove_field(&name) {
            return None;
        }
        self.clamp_selection();
        self.sync_panel();
        Some(name)
    }

    pub fn select_step(&mut self, delta: i32) {
        let len = self.configurator.config().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        self.sync_panel();
    }

    /// Shift the selected field one place up or down. Returns the new position.
    pub fn move_selected(&mut self, delta: i32) -> Option<usize> {
        let len = self.configurator.config().len();
        let target = self.selected as i64 + delta as i64;
        if len == 0 || target < 0 || target >= len as i64 {
            return None;
        }
        let target = target as usize;
        if !self.configurator.handle_field_order(self.selected, target) {
            return None;
        }
        self.selected = target;
        Some(target)
    }

    /// Start dragging the selected field, or drop the one being dragged at
    /// the selection.
    pub fn toggle_grab(&mut self) -> GrabOutcome {
        match self.configurator.dragged_field().map(str::to_string) {
            None => match self.selected_field() {
                Some(name) => {
                    self.configurator.start_drag(&name);
                    GrabOutcome::Started(name)
                }
                None => GrabOutcome::Nothing,
            },
            Some(dragged) => {
                if self.configurator.drop_dragged(self.selected) {
                    self.sync_panel();
                    GrabOutcome::Dropped(dragged, self.selected)
                } else {
                    GrabOutcome::Cancelled
                }
            }
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        let dragging = self.configurator.dragged_field().is_some();
        self.configurator.clear_drag();
        dragging
    }

    /// Route a key that no binding claimed to the focused area.
    pub fn handle_input(&mut self, key: &KeyEvent) -> bool {
        match self.focus {
            ConfigureFocus::NewName => handle_text_edit(&mut self.draft_name, key),
            ConfigureFocus::NewType => match key.code {
                KeyCode::Left => self.cycle_draft_type(-1),
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_draft_type(1),
                _ => false,
            },
            ConfigureFocus::Fields => false,
            ConfigureFocus::Meta => self.handle_meta_key(key),
            ConfigureFocus::TypeConfig => self.handle_type_config_key(key),
        }
    }

    fn cycle_draft_type(&mut self, delta: i64) -> bool {
        let len = self.type_names.len() as i64;
        if len == 0 {
            return false;
        }
        self.draft_type = (self.draft_type as i64 + delta).rem_euclid(len) as usize;
        true
    }

    fn handle_meta_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.row = self.row.step(-1);
                return false;
            }
            KeyCode::Down => {
                self.row = self.row.step(1);
                return false;
            }
            _ => {}
        }
        let Some(name) = self.selected_field() else {
            return false;
        };
        let Some(field) = self.configurator.config().get(&name) else {
            return false;
        };
        let mut meta = field.meta.clone();
        let delta = match key.code {
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            _ => 0,
        };
        match self.row {
            MetaRow::Label => {
                if !handle_text_edit(&mut meta.label, key) {
                    return false;
                }
            }
            MetaRow::Description => {
                let mut text = meta.description.take().unwrap_or_default();
                let edited = handle_text_edit(&mut text, key);
                meta.description = (!text.is_empty()).then_some(text);
                if !edited {
                    return false;
                }
            }
            MetaRow::Icon => {
                if delta == 0 {
                    return false;
                }
                meta.icon = self
                    .icons
                    .cycle(meta.icon.as_deref(), delta)
                    .map(str::to_string);
            }
            MetaRow::Type => {
                if delta == 0 {
                    return false;
                }
                let current = self
                    .type_names
                    .iter()
                    .position(|type_name| *type_name == field.type_name)
                    .unwrap_or(0) as isize;
                let len = self.type_names.len() as isize;
                if len == 0 {
                    return false;
                }
                let next = (current + delta).rem_euclid(len) as usize;
                return self.set_field_type(&name, next);
            }
        }
        self.configurator
            .handle_config_change(&name, FieldConfigPatch::new().with_meta(meta))
    }

    /// Switch `field` to the type at `idx`. The old validation object belongs
    /// to the old type, so it is cleared.
    pub fn set_field_type(&mut self, field: &str, idx: usize) -> bool {
        let Some(type_name) = self.type_names.get(idx).cloned() else {
            return false;
        };
        if self
            .configurator
            .config()
            .get(field)
            .is_some_and(|config| config.type_name == type_name)
        {
            return false;
        }
        let patch = FieldConfigPatch::new()
            .with_type(type_name)
            .with_validation(Validation::new());
        let changed = self.configurator.handle_config_change(field, patch);
        self.type_configure = None;
        self.sync_panel();
        changed
    }

    fn handle_type_config_key(&mut self, key: &KeyEvent) -> bool {
        let Some((field, editor)) = self.type_configure.as_mut() else {
            return false;
        };
        let Some(validation) = editor.handle_key(key) else {
            return false;
        };
        let field = field.clone();
        self.configurator
            .handle_config_change(&field, FieldConfigPatch::new().with_validation(validation))
    }

    pub fn revert(&mut self) {
        self.configurator.reset(&self.initial);
        self.type_configure = None;
        self.clamp_selection();
        self.sync_panel();
    }

    pub fn mark_saved(&mut self) -> FormConfig {
        self.initial = self.configurator.config().clone();
        self.initial.clone()
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.configurator.config().len().saturating_sub(1));
        if self.selected_field().is_none()
            && matches!(self.focus, ConfigureFocus::Meta | ConfigureFocus::TypeConfig)
        {
            self.focus = ConfigureFocus::Fields;
        }
    }

    /// Keep the type configuration editor bound to the selected field.
    fn sync_panel(&mut self) {
        let Some(name) = self.selected_field() else {
            self.type_configure = None;
            return;
        };
        if self
            .type_configure
            .as_ref()
            .is_some_and(|(field, _)| *field == name)
        {
            return;
        }
        self.type_configure = self
            .configurator
            .config()
            .get(&name)
            .and_then(|config| {
                let implementation = self.registry.get(&config.type_name)?;
                Some(implementation.configure(&config.validation, &self.context))
            })
            .map(|editor| (name, editor));
    }

    pub fn render<'a>(&'a self, title: &'a str, icons: &'a IconSet) -> ConfigureRender<'a> {
        let panel = self.type_configure.as_ref().and_then(|(field, editor)| {
            let config = self.configurator.config().get(field)?;
            Some(PanelRender {
                field,
                config,
                row: self.row,
                type_configure: editor.as_ref(),
            })
        });
        ConfigureRender {
            title,
            configurator: &self.configurator,
            icons,
            focus: self.focus,
            draft_name: &self.draft_name,
            draft_type: self.draft_type(),
            selected: (!self.configurator.config().is_empty()).then_some(self.selected),
            panel,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/app/configure_screen_tests.rs"]
mod tests;
