use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;

use crate::{
    domain::{FormConfig, FormMode, FormValues},
    presentation::{self, ScreenRender, UiContext},
};

use super::{
    input::{CommandDispatch, KeyAction, classify},
    keymap::{KeymapContext, help_text},
    options::UiOptions,
    popup::{PopupState, PopupTarget},
    probe_worker::ProbeWorker,
    status::StatusLine,
    terminal::TerminalGuard,
};

mod configure_screen;
mod form_screen;

pub(crate) use configure_screen::{ConfigureScreen, GrabOutcome};
pub(crate) use form_screen::FormScreen;

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Last values saved in an edit session.
    Values(FormValues),
    /// Last config saved in a configure session.
    Config(FormConfig),
    /// A view session was closed.
    Closed,
}

pub(crate) enum Screen {
    Form(FormScreen),
    Configure(ConfigureScreen),
}

pub(crate) struct App {
    title: String,
    screen: Screen,
    options: UiOptions,
    status: StatusLine,
    exit_armed: bool,
    should_quit: bool,
    result: Option<SessionOutcome>,
    popup: Option<PopupState>,
    probes: Option<ProbeWorker>,
}

impl App {
    pub fn new(title: String, screen: Screen, options: UiOptions) -> Self {
        let mut status = StatusLine::new();
        if matches!(&screen, Screen::Form(form) if form.mode() == FormMode::View) {
            status.read_only();
        }
        Self {
            title,
            screen,
            options,
            status,
            exit_armed: false,
            should_quit: false,
            result: None,
            popup: None,
            probes: None,
        }
    }

    fn keymap_contexts(&self) -> Vec<KeymapContext> {
        match &self.screen {
            Screen::Form(form) if form.mode() == FormMode::View => vec![KeymapContext::View],
            Screen::Form(_) => vec![KeymapContext::Edit],
            Screen::Configure(configure) => configure.keymap_contexts().to_vec(),
        }
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        if self.popup.is_some() {
            return Some("↑/↓ choose • Enter apply • Esc cancel".to_string());
        }
        help_text(&self.keymap_contexts())
    }

    fn is_dirty(&self) -> bool {
        match &self.screen {
            Screen::Form(form) => form.is_dirty(),
            Screen::Configure(configure) => configure.is_dirty(),
        }
    }

    fn error_count(&self) -> usize {
        match &self.screen {
            Screen::Form(form) => form.error_count(),
            Screen::Configure(configure) => configure.error_count(),
        }
    }

    pub fn run(&mut self) -> Result<SessionOutcome> {
        if matches!(&self.screen, Screen::Form(form) if form.mode() == FormMode::Edit) {
            self.probes = Some(ProbeWorker::spawn(std::sync::Arc::clone(&self.options.probe))?);
        }
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            self.collect_probe_results();
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        match self.result.take() {
            Some(outcome) => Ok(outcome),
            None => match &self.screen {
                Screen::Form(form) if form.mode() == FormMode::View => Ok(SessionOutcome::Closed),
                _ => Err(anyhow!("user exited without saving")),
            },
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        let ctx = UiContext {
            status_message: self.status.message(),
            dirty: self.is_dirty(),
            error_count: self.error_count(),
            help: help.as_deref(),
            focus_label: self.focus_label(),
            popup: self.popup.as_ref().map(PopupState::as_render),
        };
        let icons = self.options.icons();
        let screen = match &self.screen {
            Screen::Form(form) => ScreenRender::Form(form.render(&self.title, icons)),
            Screen::Configure(configure) => {
                ScreenRender::Configure(configure.render(&self.title, icons))
            }
        };
        presentation::draw(frame, screen, ctx);
    }

    fn focus_label(&self) -> Option<String> {
        match &self.screen {
            Screen::Form(form) => form.focused().map(|(_, label)| label),
            Screen::Configure(configure) => configure.selected_field(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_popup_key(&key) {
            return;
        }
        match classify(&key, &self.keymap_contexts()) {
            CommandDispatch::App(action) => self.handle_action(action),
            CommandDispatch::Input(event) => self.handle_input(&event),
        }
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) -> bool {
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                self.status.ready();
            }
            KeyCode::Up => popup.select_previous(),
            KeyCode::Down => popup.select_next(),
            KeyCode::Enter => {
                let target = popup.target().clone();
                let selection = popup.selection();
                self.popup = None;
                if let Screen::Configure(configure) = &mut self.screen {
                    match target {
                        PopupTarget::NewFieldType => configure.set_draft_type(selection),
                        PopupTarget::FieldType(field) => {
                            configure.set_field_type(&field, selection);
                        }
                    }
                }
                self.status.ready();
            }
            _ => {}
        }
        true
    }

    fn handle_action(&mut self, action: KeyAction) {
        if action != KeyAction::Quit {
            self.exit_armed = false;
        }
        match action {
            KeyAction::Save => self.on_save(),
            KeyAction::Quit => self.on_exit(),
            KeyAction::ResetStatus => {
                if let Screen::Configure(configure) = &mut self.screen {
                    configure.cancel_drag();
                }
                self.status.ready();
            }
            KeyAction::Revert => {
                match &mut self.screen {
                    Screen::Form(form) => form.revert(),
                    Screen::Configure(configure) => configure.revert(),
                }
                self.status.reverted();
            }
            KeyAction::FocusStep(delta) => match &mut self.screen {
                Screen::Form(form) => form.step_focus(delta),
                Screen::Configure(configure) => configure.step_focus(delta),
            },
            KeyAction::ListSelect(delta) => match &mut self.screen {
                Screen::Form(form) => form.step_focus(delta),
                Screen::Configure(configure) => configure.select_step(delta),
            },
            KeyAction::ListMove(delta) => {
                if let Screen::Configure(configure) = &mut self.screen
                    && let Some(position) = configure.move_selected(delta)
                    && let Some(name) = configure.selected_field()
                {
                    self.status.field_moved(&name, position);
                }
            }
            KeyAction::ListGrab => {
                if let Screen::Configure(configure) = &mut self.screen {
                    match configure.toggle_grab() {
                        GrabOutcome::Started(name) => self.status.dragging(&name),
                        GrabOutcome::Dropped(name, position) => {
                            self.status.field_moved(&name, position)
                        }
                        GrabOutcome::Cancelled | GrabOutcome::Nothing => self.status.ready(),
                    }
                }
            }
            KeyAction::ListAddEntry => {
                if let Screen::Configure(configure) = &mut self.screen {
                    match configure.add_field() {
                        Ok(name) => self.status.field_added(&name),
                        Err(error) => self.status.set_raw(error.message()),
                    }
                }
            }
            KeyAction::ListRemoveEntry => {
                if let Screen::Configure(configure) = &mut self.screen
                    && let Some(name) = configure.remove_selected()
                {
                    self.status.field_removed(&name);
                }
            }
            KeyAction::TogglePopup => self.open_type_popup(),
        }
    }

    fn open_type_popup(&mut self) {
        let Screen::Configure(configure) = &self.screen else {
            return;
        };
        let popup = match configure.focus() {
            presentation::ConfigureFocus::NewName | presentation::ConfigureFocus::NewType => {
                PopupState::type_picker(
                    PopupTarget::NewFieldType,
                    configure.type_names(),
                    configure.draft_type(),
                )
            }
            _ => configure.selected_field().and_then(|field| {
                let current = configure
                    .config()
                    .get(&field)
                    .map(|config| config.type_name.clone())
                    .unwrap_or_default();
                PopupState::type_picker(
                    PopupTarget::FieldType(field),
                    configure.type_names(),
                    &current,
                )
            }),
        };
        self.popup = popup;
    }

    fn handle_input(&mut self, key: &KeyEvent) {
        match &mut self.screen {
            Screen::Form(form) => {
                if let Some(label) = form.handle_input(key) {
                    self.exit_armed = false;
                    self.status.editing(&label);
                }
                let jobs = form.take_probe_jobs();
                if !jobs.is_empty()
                    && let Some((_, label)) = form.focused()
                {
                    self.status.validating_image(&label);
                }
                if let Some(worker) = &self.probes {
                    for job in jobs {
                        if !worker.submit(job) {
                            tracing::warn!("image probe worker is gone");
                        }
                    }
                }
            }
            Screen::Configure(configure) => {
                if configure.handle_input(key) {
                    self.exit_armed = false;
                }
            }
        }
    }

    fn collect_probe_results(&mut self) {
        let (Some(worker), Screen::Form(form)) = (&self.probes, &mut self.screen) else {
            return;
        };
        for outcome in worker.drain() {
            form.apply_probe(outcome);
        }
    }

    fn on_save(&mut self) {
        match &mut self.screen {
            Screen::Form(form) => {
                if form.mode() != FormMode::Edit {
                    return;
                }
                if form.validate_all() {
                    self.result = Some(SessionOutcome::Values(form.mark_saved()));
                    self.status.saved();
                } else {
                    self.status.issues_remaining(form.error_count());
                }
            }
            Screen::Configure(configure) => {
                self.result = Some(SessionOutcome::Config(configure.mark_saved()));
                self.status.saved();
            }
        }
        self.exit_armed = false;
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
#[path = "../../tests/app/runtime_tests.rs"]
mod tests;
