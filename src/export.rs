//! CSV export of the filtered results.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::data::model::{InvestmentValue, StartupRecord};

/// Column order of the export, also the header row.
pub const CSV_COLUMNS: [&str; 10] = [
    "nome",
    "site",
    "setor",
    "ano_fundacao",
    "valor_investimento",
    "rodada",
    "data_investimento",
    "vc_investidor",
    "descricao_breve",
    "linkedin_fundador",
];

/// `startups_export_2024-05-01.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("startups_export_{}.csv", date.format("%Y-%m-%d"))
}

/// File name for an export made today (UTC).
pub fn default_export_file_name() -> String {
    export_file_name(Utc::now().date_naive())
}

fn csv_row(rec: &StartupRecord) -> [String; 10] {
    let value = match &rec.investment_value {
        InvestmentValue::Number(n) => n.to_string(),
        InvestmentValue::Text(s) => s.clone(),
    };
    [
        rec.name.clone(),
        rec.site.clone(),
        rec.sector.clone(),
        rec.founding_year.map(|y| y.to_string()).unwrap_or_default(),
        value,
        rec.round.clone(),
        rec.investment_date.clone(),
        rec.investor_name.clone(),
        rec.short_description.clone(),
        rec.founder_linkedin.clone(),
    ]
}

/// Write a BOM, the bare header line and one fully-quoted row per record.
pub fn write_csv<'a, W: Write>(
    mut out: W,
    records: impl IntoIterator<Item = &'a StartupRecord>,
) -> Result<()> {
    writeln!(out, "\u{feff}{}", CSV_COLUMNS.join(","))?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    for rec in records {
        writer.write_record(csv_row(rec))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the export into a string.
pub fn build_csv<'a>(records: impl IntoIterator<Item = &'a StartupRecord>) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Write the export to `path`, replacing any existing file.
pub fn export_to_path<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a StartupRecord>,
) -> Result<usize> {
    let records: Vec<&StartupRecord> = records.into_iter().collect();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), records.iter().copied())
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} startups to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::normalize_startup;
    use serde_json::json;

    #[test]
    fn quotes_are_doubled() {
        let rec = normalize_startup(&json!({"nome": "a\"b", "setor": "Fintech"}));
        let csv = build_csv([&rec]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"a\"\"b\","));
    }

    #[test]
    fn header_and_every_cell_quoted() {
        let rec = normalize_startup(&json!({
            "nome": "Foo",
            "setor": "Fintech",
            "ano_fundacao": 2020,
            "valor_investimento": 1500000
        }));
        let csv = build_csv([&rec]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), format!("\u{feff}{}", CSV_COLUMNS.join(",")));
        assert_eq!(
            lines.next().unwrap(),
            "\"Foo\",\"\",\"Fintech\",\"2020\",\"1500000\",\"Não informada\",\"Não informada\",\"Não informado\",\"\",\"\""
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn embedded_newlines_stay_in_one_cell() {
        let rec = normalize_startup(&json!({"nome": "Foo", "descricao_breve": "linha 1\nlinha 2"}));
        let csv = build_csv([&rec]).unwrap();
        assert!(csv.contains("\"linha 1\nlinha 2\""));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(export_file_name(date), "startups_export_2024-05-01.csv");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let recs = [normalize_startup(&json!({"nome": "A"})), normalize_startup(&json!({"nome": "B"}))];
        assert_eq!(export_to_path(&path, &recs).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
