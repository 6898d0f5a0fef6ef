use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::note::Chart;

/// Load a `.skym` chart file.
///
/// The file is JSON holding either a single chart object or an array
/// of charts, in which case the first entry is taken. Key names are
/// normalized on load.
pub fn load_chart(path: &Path) -> Result<Chart> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read chart file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("chart file {} is not valid JSON", path.display()))?;

    let value = match value {
        Value::Array(mut items) => {
            if items.is_empty() {
                bail!("chart file {} is an empty list", path.display());
            }
            items.remove(0)
        }
        other => other,
    };

    let mut chart: Chart = serde_json::from_value(value)
        .with_context(|| format!("chart file {} has an unexpected shape", path.display()))?;
    for note in &mut chart.notes {
        note.key = normalize_key(&note.key);
    }
    Ok(chart)
}

/// Normalize a key name, e.g. "1key3" -> "1Key3".
///
/// Chart files in the wild disagree on the casing of "Key"; the
/// mapping table expects the capitalized form.
pub fn normalize_key(raw: &str) -> String {
    let low = raw.to_lowercase();
    match low.find("key") {
        Some(idx) => format!("{}Key{}", &low[..idx], &low[idx + 3..]),
        None => raw.to_string(),
    }
}
