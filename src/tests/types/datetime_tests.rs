use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use super::*;
use crate::types::line_text;

fn rules(value: Value) -> Validation {
    value.as_object().cloned().unwrap_or_default()
}

fn moment(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid moment")
}

#[test]
fn parses_accepted_forms() {
    let expected = moment(1986, 9, 4, 20, 30);
    assert_eq!(parse_datetime("1986-09-04T20:30"), Some(expected));
    assert_eq!(parse_datetime("1986-09-04 20:30:00"), Some(expected));
    assert_eq!(
        parse_datetime("1986-09-04"),
        Some(moment(1986, 9, 4, 0, 0))
    );
    assert_eq!(parse_datetime("20:30"), Some(moment(1970, 1, 1, 20, 30)));
    assert!(parse_datetime("2024-01-01T10:00:00Z").is_some());
    assert_eq!(parse_datetime("not a date"), None);
    assert_eq!(parse_datetime(""), None);
}

#[test]
fn empty_value_checks_required_only() {
    let optional = rules(json!({"min": "2020-01-01"}));
    assert!(validate_datetime(&json!(""), &optional).is_valid());

    let required = rules(json!({"required": true}));
    assert_eq!(
        validate_datetime(&Value::Null, &required),
        Validity::invalid("This field is required")
    );
}

#[test]
fn garbage_is_invalid_even_when_optional() {
    assert_eq!(
        validate_datetime(&json!("someday"), &Validation::new()),
        Validity::invalid("Invalid date")
    );
}

#[test]
fn bounds_render_long_format() {
    let validation = rules(json!({"min": "1986-09-04T20:30", "max": "1986-12-31T00:00"}));
    assert_eq!(
        validate_datetime(&json!("1986-09-01"), &validation),
        Validity::invalid("Date must be after Thursday, September 4, 1986 8:30 PM")
    );
    assert_eq!(
        validate_datetime(&json!("1987-01-01"), &validation),
        Validity::invalid("Date must be before Wednesday, December 31, 1986 12:00 AM")
    );
    assert!(validate_datetime(&json!("1986-10-10T10:10"), &validation).is_valid());
}

#[test]
fn display_modes() {
    let at = moment(1986, 9, 4, 20, 30);
    let now = at + Duration::days(3);
    assert_eq!(format_moment(&at, DisplayMode::Date, &now), "September 4, 1986");
    assert_eq!(
        format_moment(&at, DisplayMode::DateTime, &now),
        "Thursday, September 4, 1986 8:30 PM"
    );
    assert_eq!(format_moment(&at, DisplayMode::Time, &now), "8:30 PM");
    assert_eq!(format_moment(&at, DisplayMode::FromNow, &now), "3 days ago");
}

#[test]
fn relative_phrases_follow_thresholds() {
    let now = moment(2024, 6, 1, 12, 0);
    let cases = [
        (Duration::seconds(-10), "a few seconds ago"),
        (Duration::seconds(60), "in a minute"),
        (Duration::minutes(-5), "5 minutes ago"),
        (Duration::minutes(60), "in an hour"),
        (Duration::hours(-5), "5 hours ago"),
        (Duration::hours(30), "in a day"),
        (Duration::days(-10), "10 days ago"),
        (Duration::days(30), "in a month"),
        (Duration::days(-120), "4 months ago"),
        (Duration::days(400), "in a year"),
        (Duration::days(-800), "2 years ago"),
    ];
    for (offset, expected) in cases {
        assert_eq!(humanize_relative(&(now + offset), &now), expected, "{offset:?}");
    }
}

#[test]
fn display_skips_unparseable_values() {
    let context = RenderContext::default();
    assert!(
        DateTimeObjectType
            .display(&json!("nope"), &Validation::new(), &context)
            .is_none()
    );
    let line = DateTimeObjectType
        .display(
            &json!("1986-09-04T20:30"),
            &rules(json!({"displayMode": "date"})),
            &context,
        )
        .expect("line");
    assert_eq!(line_text(&line), "September 4, 1986");
}

#[test]
fn input_reformats_seed_and_previews() {
    let validation = rules(json!({"type": "date"}));
    let mut input = DateTimeInput::new(&json!("1986-09-04T20:30"), &validation);
    assert_eq!(input.value(), json!("1986-09-04"));

    let change = input
        .handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
        .expect("change");
    assert!(!change.is_valid);
    let lines = input.lines(true);
    assert_eq!(line_text(&lines[1]), "Invalid date");
}

#[test]
fn configure_hides_bounds_for_time_only() {
    let context = RenderContext::default();
    let editor = DateTimeObjectType.configure(&rules(json!({"type": "time"})), &context);
    assert_eq!(editor.lines(false).len(), 3);

    let editor = DateTimeObjectType.configure(&Validation::new(), &context);
    assert_eq!(editor.lines(false).len(), 5);
}
