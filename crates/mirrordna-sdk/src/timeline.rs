use crate::document::read_document;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Fields every timeline event must carry.
pub const REQUIRED_EVENT_FIELDS: &[&str] = &["id", "timestamp", "event_type", "actor"];

const UNKNOWN: &str = "unknown";

/// Outcome of a structural timeline check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineReport {
    /// True when no errors were found.
    pub valid: bool,
    /// Number of events in the file.
    pub event_count: usize,
    /// Timeline identifier, `unknown` when the file does not name one.
    pub timeline_id: Option<String>,
    /// Every problem found.
    pub errors: Vec<String>,
    /// Timestamp of the first event.
    pub first_event: Option<String>,
    /// Timestamp of the last event.
    pub last_event: Option<String>,
}

impl TimelineReport {
    fn failed(error: String) -> Self {
        Self {
            valid: false,
            event_count: 0,
            timeline_id: None,
            errors: vec![error],
            first_event: None,
            last_event: None,
        }
    }
}

/// Checks a timeline file's structure. Never fails: every problem, including an
/// unreadable file, is reported in [`TimelineReport::errors`].
pub fn validate_timeline(path: impl AsRef<Path>) -> TimelineReport {
    let path = path.as_ref();
    let report = match read_document(path) {
        Ok(value) => validate_timeline_value(&value),
        Err(err) => TimelineReport::failed(err.to_string()),
    };
    tracing::debug!(
        path = %path.display(),
        valid = report.valid,
        events = report.event_count,
        "validated timeline"
    );
    report
}

/// Checks an already parsed timeline: either a list of events or a mapping
/// with an `events` list and an optional `timeline_id`.
pub fn validate_timeline_value(value: &Value) -> TimelineReport {
    let (events, timeline_id) = match value {
        Value::Array(events) => (events.as_slice(), UNKNOWN.to_string()),
        Value::Object(fields) => {
            let events = match fields.get("events") {
                None => &[][..],
                Some(Value::Array(events)) => events.as_slice(),
                Some(_) => return TimelineReport::failed("'events' must be a list".to_string()),
            };
            let timeline_id = match fields.get("timeline_id") {
                Some(Value::String(id)) => id.clone(),
                Some(other) => other.to_string(),
                None => UNKNOWN.to_string(),
            };
            (events, timeline_id)
        }
        _ => {
            return TimelineReport::failed(
                "timeline must be a list or a mapping with an 'events' key".to_string(),
            )
        }
    };

    let mut errors = Vec::new();
    for (index, event) in events.iter().enumerate() {
        let Value::Object(fields) = event else {
            errors.push(format!("event {} is not a mapping", index));
            continue;
        };
        let missing: Vec<&str> = REQUIRED_EVENT_FIELDS
            .iter()
            .copied()
            .filter(|field| !fields.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            errors.push(format!("event {} missing fields: {:?}", index, missing));
        }
    }

    TimelineReport {
        valid: errors.is_empty(),
        event_count: events.len(),
        timeline_id: Some(timeline_id),
        errors,
        first_event: events.first().map(event_timestamp),
        last_event: events.last().map(event_timestamp),
    }
}

fn event_timestamp(event: &Value) -> String {
    match event.get("timestamp") {
        Some(Value::String(ts)) => ts.clone(),
        Some(other) => other.to_string(),
        None => UNKNOWN.to_string(),
    }
}
