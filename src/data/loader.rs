use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value as JsonValue};

use super::model::StartupRecord;
use super::normalize::{normalize_payload, normalize_startup};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load previously saved results from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – a full search response (`{"resultado": ...}`) or a bare payload
///   in any shape the backend produces
/// * `.csv`  – a file written by the CSV export
pub fn load_file(path: &Path) -> Result<Vec<StartupRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<StartupRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    Ok(records_from_json(root))
}

/// Unwrap a saved response envelope if there is one, then normalize.
pub fn records_from_json(root: JsonValue) -> Vec<StartupRecord> {
    match root {
        JsonValue::Object(mut obj) if obj.contains_key("resultado") => {
            normalize_payload(obj.remove("resultado").unwrap_or(JsonValue::Null))
        }
        other => normalize_payload(other),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Each row becomes an object keyed by the header names, then goes through
/// the same normalizer as backend records. Empty cells are dropped so they
/// fall back to placeholders.
fn load_csv(path: &Path) -> Result<Vec<StartupRecord>> {
    let text = std::fs::read_to_string(path).context("reading CSV file")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut obj = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if cell.is_empty() {
                continue;
            }
            obj.insert(header.clone(), JsonValue::String(cell.to_string()));
        }
        records.push(normalize_startup(&JsonValue::Object(obj)));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn envelope_is_unwrapped() {
        let records = records_from_json(json!({"resultado": [{"nome": "A"}, {"nome": "B"}]}));
        assert_eq!(records.len(), 2);
        let records = records_from_json(json!({"resultado": {"nome": "Solo"}}));
        assert_eq!(records[0].name, "Solo");
    }

    #[test]
    fn bare_payload_is_accepted() {
        let records = records_from_json(json!({"result": [{"nome": "A"}]}));
        assert_eq!(records[0].name, "A");
    }

    #[test]
    fn loads_exported_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            file,
            "\u{feff}nome,site,setor,ano_fundacao,valor_investimento\n\"Foo\",\"\",\"Fintech\",\"2020\",\"1.2M\"\n"
        )
        .unwrap();

        let records = load_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Foo");
        assert_eq!(records[0].founding_year, Some(2020));
        assert_eq!(records[0].investment_value.amount(), Some(1_200_000));
    }

    #[test]
    fn unknown_extension_fails() {
        assert!(load_file(Path::new("results.parquet")).is_err());
    }
}
