use std::{
    io,
    sync::{Arc, Mutex},
};

use indexmap::IndexMap;
use ratatui::style::{Color, Modifier};
use serde_json::json;

use super::*;
use crate::{
    domain::{FormMode, normalize_field, values_from_value},
    form::FormSession,
    registry::{FieldInput, ObjectTypeRegistry},
    types::line_text,
};

fn texts(lines: &[Line<'_>]) -> Vec<String> {
    lines.iter().map(line_text).collect()
}

fn session(mode: FormMode) -> FormSession {
    let config = json!({
        "fields": {
            "age": {
                "type": "number",
                "validation": {"required": true, "max": 10},
                "meta": {"order": 0, "label": "Age", "description": "Years since birth", "icon": "star"}
            },
            "nick": {"type": "string", "meta": {"order": 1, "label": ""}}
        }
    });
    FormSession::new(Arc::new(ObjectTypeRegistry::builtin()), &config, mode)
        .with_initial_values(values_from_value(&json!({"age": 1234, "nick": "ace"})))
}

#[test]
fn header_carries_icon_label_and_required_marker() {
    let config = normalize_field(
        "age",
        &json!({"type": "number", "validation": {"required": true}, "meta": {"order": 0, "label": "Age", "icon": "star"}}),
    );
    let lines = header_lines("age", &config, &IconSet::builtin(), false, 40);
    assert_eq!(texts(&lines), vec!["★ Age *"]);
    let star = &lines[0].spans[2];
    assert_eq!(star.style.fg, Some(Color::Red));
}

#[test]
fn header_label_falls_back_to_key_and_unknown_icon_to_question() {
    let config = normalize_field(
        "nick",
        &json!({"type": "string", "meta": {"order": 0, "label": "", "icon": "unicorn", "description": "Shown to others"}}),
    );
    let lines = header_lines("nick", &config, &IconSet::builtin(), true, 40);
    assert_eq!(texts(&lines), vec!["? nick", "  Shown to others"]);
    let label = &lines[0].spans[1];
    assert_eq!(label.style.fg, Some(Color::Yellow));
    assert!(label.style.add_modifier.contains(Modifier::BOLD));
}

#[test]
fn view_mode_shows_display_without_errors() {
    let mut session = session(FormMode::Edit);
    session.handle_field_change("age", json!(1234), false);
    session.set_mode(FormMode::View);
    let editors: IndexMap<String, Box<dyn FieldInput>> = IndexMap::new();
    let context = RenderContext::default();
    let icons = IconSet::builtin();
    let form = FormRender {
        title: "Profile",
        session: &session,
        editors: &editors,
        context: &context,
        icons: &icons,
        selected: None,
    };
    let config = session.config().get("age").cloned().expect("age");
    let lines = texts(&form_field_lines(&form, "age", &config, false, 40));
    assert_eq!(lines, vec!["★ Age *", "  Years since birth", "  1,234", ""]);
}

#[test]
fn edit_mode_renders_editor_and_error() {
    let mut session = session(FormMode::Edit);
    session.handle_field_change("age", json!(1234), false);
    let registry = ObjectTypeRegistry::builtin();
    let context = RenderContext::default();
    let config = session.config().get("age").cloned().expect("age");
    let mut editors: IndexMap<String, Box<dyn FieldInput>> = IndexMap::new();
    let editor = registry
        .get("number")
        .expect("number")
        .input(&json!(1234), &config.validation, &context);
    editors.insert("age".to_string(), editor);
    let icons = IconSet::builtin();
    let form = FormRender {
        title: "Profile",
        session: &session,
        editors: &editors,
        context: &context,
        icons: &icons,
        selected: Some(0),
    };

    let lines = texts(&form_field_lines(&form, "age", &config, false, 40));
    assert_eq!(lines[2], "  1234");
    assert!(lines.contains(&"  ✗ Maximum value is 10".to_string()));
}

#[test]
fn value_line_resolves_through_registry_fallback() {
    let registry = ObjectTypeRegistry::builtin();
    let config = normalize_field("x", &json!("no-such-type"));
    let line = value_line(&registry, &config, &json!("plain"), &RenderContext::default());
    assert_eq!(line.as_ref().map(line_text).as_deref(), Some("plain"));
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unknown_type_falls_back_once_per_session_not_per_redraw() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    let rendered = tracing::subscriber::with_default(subscriber, || {
        let session = FormSession::new(
            Arc::new(ObjectTypeRegistry::builtin()),
            &json!({"fields": {"mood": {"type": "emoji", "meta": {"order": 0, "label": "Mood"}}}}),
            FormMode::View,
        )
        .with_initial_values(values_from_value(&json!({"mood": "sunny"})));
        let editors: IndexMap<String, Box<dyn FieldInput>> = IndexMap::new();
        let context = RenderContext::default();
        let icons = IconSet::builtin();
        let form = FormRender {
            title: "Diary",
            session: &session,
            editors: &editors,
            context: &context,
            icons: &icons,
            selected: None,
        };
        let config = session.config().get("mood").cloned().expect("mood");
        (0..3)
            .map(|_| texts(&form_field_lines(&form, "mood", &config, false, 40)))
            .last()
            .expect("rendered")
    });

    assert!(rendered.contains(&"  sunny".to_string()), "{rendered:?}");
    let output = String::from_utf8(log.0.lock().expect("log buffer").clone()).expect("utf8");
    assert_eq!(output.matches("falling back").count(), 1, "{output}");
}
