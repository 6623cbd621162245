#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Ctrl+S to validate and save.";
pub const VIEW_STATUS: &str = "Read only. Press Ctrl+Q to close.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn read_only(&mut self) {
        self.message = VIEW_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn validating_image(&mut self, label: &str) {
        self.message = format!("Validating image for {label}...");
    }

    pub fn field_added(&mut self, name: &str) {
        self.message = format!("Added field {name}");
    }

    pub fn field_removed(&mut self, name: &str) {
        self.message = format!("Removed field {name}");
    }

    pub fn field_moved(&mut self, name: &str, position: usize) {
        self.message = format!("Moved {name} to position {}", position + 1);
    }

    pub fn dragging(&mut self, name: &str) {
        self.message = format!("Moving {name}. Select a position and press Space to drop.");
    }

    pub fn reverted(&mut self) {
        self.message = "Reverted to the initial state".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn saved(&mut self) {
        self.message = "Saved. Press Ctrl+Q to exit.".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
