use crossterm::event::KeyEvent;
use indexmap::IndexMap;

use crate::{
    domain::{FormMode, FormValues},
    form::{FormSession, ProbeTracker},
    presentation::{FormRender, IconSet},
    registry::FieldInput,
    types::RenderContext,
};

use super::super::probe_worker::{ProbeJob, ProbeOutcome};

/// View or edit session plus the live editors feeding it.
pub(crate) struct FormScreen {
    session: FormSession,
    initial_values: FormValues,
    editors: IndexMap<String, Box<dyn FieldInput>>,
    selected: usize,
    tracker: ProbeTracker,
    context: RenderContext,
}

impl FormScreen {
    pub fn new(session: FormSession, context: RenderContext) -> Self {
        let initial_values = session.values().clone();
        let mut screen = Self {
            session,
            initial_values,
            editors: IndexMap::new(),
            selected: 0,
            tracker: ProbeTracker::new(),
            context,
        };
        screen.rebuild_editors();
        screen
    }

    fn rebuild_editors(&mut self) {
        self.editors.clear();
        if self.session.mode() != FormMode::Edit {
            return;
        }
        for (name, config) in self.session.sorted_fields() {
            let Some(implementation) = self.session.implementation(name) else {
                continue;
            };
            let editor =
                implementation.input(self.session.value(name), &config.validation, &self.context);
            self.editors.insert(name.to_string(), editor);
        }
    }

    pub fn mode(&self) -> FormMode {
        self.session.mode()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn error_count(&self) -> usize {
        self.session
            .errors()
            .values()
            .filter(|message| !message.is_empty())
            .count()
    }

    /// Name and label of the focused visible field.
    pub fn focused(&self) -> Option<(String, String)> {
        let visible = self.session.visible_fields();
        let (name, config) = visible.get(self.selected)?;
        Some((name.to_string(), config.display_label(name).to_string()))
    }

    pub fn step_focus(&mut self, delta: i32) {
        let len = self.session.visible_fields().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as i64 + delta as i64).rem_euclid(len as i64);
        self.selected = next as usize;
    }

    /// Feed `key` to the focused editor. Returns the label of the field when
    /// the session accepted a change. Any probe still running for the field
    /// is superseded by the edit.
    pub fn handle_input(&mut self, key: &KeyEvent) -> Option<String> {
        let (name, label) = self.focused()?;
        let change = self.editors.get_mut(&name)?.handle_key(key)?;
        self.tracker.forget(&name);
        self.session
            .handle_field_change(&name, change.value, change.is_valid)
            .then_some(label)
    }

    /// Probe requests queued by editors since the last call, each tagged with
    /// a fresh sequence number.
    pub fn take_probe_jobs(&mut self) -> Vec<ProbeJob> {
        let mut jobs = Vec::new();
        for (name, editor) in self.editors.iter_mut() {
            if let Some(request) = editor.take_probe_request() {
                let seq = self.tracker.issue(name);
                jobs.push(ProbeJob {
                    field: name.clone(),
                    seq,
                    request,
                });
            }
        }
        jobs
    }

    /// Apply a finished probe unless a newer one was issued for its field.
    pub fn apply_probe(&mut self, outcome: ProbeOutcome) -> bool {
        if !self.tracker.is_current(&outcome.field, outcome.seq) {
            tracing::debug!(field = %outcome.field, seq = outcome.seq, "stale probe result dropped");
            return false;
        }
        self.tracker.forget(&outcome.field);
        let Some(editor) = self.editors.get_mut(&outcome.field) else {
            return false;
        };
        match editor.apply_probe(outcome.outcome) {
            Some(change) => {
                self.session
                    .handle_field_change(&outcome.field, change.value, change.is_valid)
            }
            None => false,
        }
    }

    pub fn validate_all(&mut self) -> bool {
        self.session.validate_all()
    }

    /// Restore the values the screen was opened with.
    pub fn revert(&mut self) {
        self.session.reset(self.initial_values.clone());
        let names = self.editors.keys().cloned().collect::<Vec<_>>();
        for name in names {
            self.tracker.forget(&name);
        }
        self.rebuild_editors();
    }

    /// Make the current values the new baseline and return them.
    pub fn mark_saved(&mut self) -> FormValues {
        let values = self.session.values().clone();
        self.initial_values = values.clone();
        self.session.reset(values.clone());
        values
    }

    pub fn render<'a>(&'a self, title: &'a str, icons: &'a IconSet) -> FormRender<'a> {
        FormRender {
            title,
            session: &self.session,
            editors: &self.editors,
            context: &self.context,
            icons,
            selected: Some(self.selected),
        }
    }
}
