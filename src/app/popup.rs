use crate::presentation::PopupRender;

/// What a confirmed popup choice applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PopupTarget {
    NewFieldType,
    FieldType(String),
}

pub(crate) struct PopupState {
    target: PopupTarget,
    title: String,
    options: Vec<String>,
    selected: usize,
}

impl PopupState {
    pub(crate) fn type_picker(target: PopupTarget, options: &[String], current: &str) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        let title = match &target {
            PopupTarget::NewFieldType => "Type of new field".to_string(),
            PopupTarget::FieldType(field) => format!("Type of {field}"),
        };
        Some(Self {
            target,
            title,
            options: options.to_vec(),
            selected: options
                .iter()
                .position(|option| option == current)
                .unwrap_or(0),
        })
    }

    pub(crate) fn select_previous(&mut self) {
        if self.selected == 0 {
            self.selected = self.options.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len().max(1);
    }

    pub(crate) fn selection(&self) -> usize {
        self.selected
    }

    pub(crate) fn target(&self) -> &PopupTarget {
        &self.target
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            options: &self.options,
            selected: self.selected,
        }
    }
}
