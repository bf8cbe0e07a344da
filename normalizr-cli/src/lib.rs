//! File handling and output rendering for the `normalizr` binary.

use anyhow::{Context, Result};
use normalizr_core::{Normalized, NormalizeOptions, normalize_value};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Summary line printed to stderr after a run.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub entity_types: usize,
    pub records: usize,
    pub conflicts: usize,
}

impl RunSummary {
    #[must_use]
    pub fn of(normalized: &Normalized) -> Self {
        Self {
            entity_types: normalized.entities.keys().count(),
            records: normalized.entities.len(),
            conflicts: normalized.conflicts.len(),
        }
    }
}

/// Reads a JSON file, or stdin when `path` is `-`.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Normalizes `data` with the schema document `schema`.
///
/// Each merge conflict is already logged by the engine; only the total
/// appears in the summary line.
pub fn run(data: &Value, schema: &Value, options: &NormalizeOptions) -> Result<Normalized> {
    let normalized = normalize_value(data, schema, options).context("Normalization failed")?;

    let summary = RunSummary::of(&normalized);
    info!(
        entity_types = summary.entity_types,
        records = summary.records,
        conflicts = summary.conflicts,
        "Normalization complete"
    );
    Ok(normalized)
}

/// Loads both files and renders the `{result, entities}` document.
pub fn run_files(
    data: &Path,
    schema: &Path,
    options: &NormalizeOptions,
    pretty: bool,
) -> Result<String> {
    let data = read_json(data)?;
    let schema = read_json(schema)?;
    let normalized = run(&data, &schema, options)?;
    render(&normalized, pretty)
}

pub fn render(normalized: &Normalized, pretty: bool) -> Result<String> {
    let value = normalized.to_value();
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}
