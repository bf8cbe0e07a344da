use normalizr_cli::{RunSummary, read_json, render, run, run_files};
use normalizr_core::{Error, NormalizeOptions};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts `WARN` events emitted while it is installed.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn write_json(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn library_schema() -> Value {
    json!({
        "entities": {
            "authors": {"relations": {"books": {"array_of": {"entity": "books"}}}},
            "books": {
                "defaults": {"votes": 0},
                "relations": {"authors": {"array_of": {"entity": "authors"}}}
            }
        },
        "root": {"array_of": {"entity": "authors"}}
    })
}

// ── run ──────────────────────────────────────────────────────────

#[test]
fn run_normalizes_with_document() {
    let data = json!([{"id": 1, "books": [{"id": 10, "title": "Dune"}]}]);
    let out = run(&data, &library_schema(), &NormalizeOptions::default()).unwrap();
    assert_eq!(
        out.to_value(),
        json!({
            "result": [1],
            "entities": {
                "authors": {"1": {"id": 1, "books": [10]}},
                "books": {"10": {"votes": 0, "id": 10, "title": "Dune", "authors": [1]}}
            }
        })
    );
}

#[test]
fn run_reports_invalid_schema() {
    let err = run(&json!({}), &json!([]), &NormalizeOptions::default()).unwrap_err();
    let root = err.downcast_ref::<Error>().unwrap();
    assert!(matches!(root, Error::InvalidSchema(_)));
}

#[test]
fn run_reports_invalid_input() {
    let err = run(&json!(3), &library_schema(), &NormalizeOptions::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidInput(_))));
}

#[test]
fn summary_counts_conflicts() {
    let data = json!([
        {"id": 1, "books": [{"id": 10, "title": "Dune"}]},
        {"id": 2, "books": [{"id": 10, "title": "Dune Messiah"}]}
    ]);
    let out = run(&data, &library_schema(), &NormalizeOptions::default()).unwrap();
    assert_eq!(
        RunSummary::of(&out),
        RunSummary { entity_types: 2, records: 3, conflicts: 1 }
    );
}

#[test]
fn each_conflict_is_warned_once() {
    let data = json!([
        {"id": 1, "books": [{"id": 10, "title": "Dune"}]},
        {"id": 2, "books": [{"id": 10, "title": "Dune Messiah"}]}
    ]);
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    let out = tracing::subscriber::with_default(subscriber, || {
        run(&data, &library_schema(), &NormalizeOptions::default()).unwrap()
    });
    assert_eq!(out.conflicts.len(), 1);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}

// ── files ────────────────────────────────────────────────────────

#[test]
fn run_files_renders_compact_json() {
    let data = write_json(&json!([{"id": 1, "books": []}]));
    let schema = write_json(&library_schema());
    let text = run_files(data.path(), schema.path(), &NormalizeOptions::default(), false).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["result"], json!([1]));
    assert!(!text.contains('\n'));
}

#[test]
fn run_files_renders_pretty_json() {
    let data = write_json(&json!([{"id": 1}]));
    let schema = write_json(&library_schema());
    let text = run_files(data.path(), schema.path(), &NormalizeOptions::default(), true).unwrap();
    assert!(text.contains('\n'));
}

#[test]
fn missing_file_is_an_error() {
    let schema = write_json(&library_schema());
    let err = run_files(
        Path::new("/nonexistent/payload.json"),
        schema.path(),
        &NormalizeOptions::default(),
        false,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn invalid_json_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ nope").unwrap();
    let err = read_json(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
}

#[test]
fn depth_limit_is_honored() {
    let data = write_json(&json!([{"id": 1, "books": [{"id": 2}]}]));
    let schema = write_json(&library_schema());
    let options = NormalizeOptions::default().with_max_depth(2);
    let err = run_files(data.path(), schema.path(), &options, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::RecursionLimit { limit: 2 })
    ));
}

#[test]
fn render_matches_to_value() {
    let out = run(&json!([]), &library_schema(), &NormalizeOptions::default()).unwrap();
    let text = render(&out, false).unwrap();
    assert_eq!(text, r#"{"result":[],"entities":{}}"#);
}
