use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Column, Record};

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Encode `records` as UTF-8 CSV: one header row with the column names,
/// then one line per record. No index column.
pub fn to_csv<'a, I>(records: I, columns: &[Column]) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.header()))
        .context("writing CSV header")?;

    for (row_no, record) in records.into_iter().enumerate() {
        writer
            .write_record(columns.iter().map(|c| c.cell(record)))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer.into_inner().context("flushing CSV buffer")
}

/// Write the CSV encoding of `records` to `path`.
pub fn write_csv<'a, I>(path: &Path, records: I, columns: &[Column]) -> Result<()>
where
    I: IntoIterator<Item = &'a Record>,
{
    let bytes = to_csv(records, columns)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Append `.csv` unless the user already typed it.
pub fn csv_file_name(stem: &str) -> String {
    let stem = stem.trim();
    let stem = if stem.is_empty() { "dados" } else { stem };
    if stem.to_ascii_lowercase().ends_with(".csv") {
        stem.to_string()
    } else {
        format!("{stem}.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn test_header_then_rows() {
        let mut rj = record("RJ", 200.0);
        rj.product = "Cadeira, de escritório".to_string();
        let records = vec![record("SP", 100.5), rj];
        let bytes = to_csv(&records, &[Column::Product, Column::Location, Column::Price]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Produto,Local da compra,Preço");
        assert_eq!(lines[1], "Modelagem preditiva,SP,100.5");
        assert_eq!(lines[2], "\"Cadeira, de escritório\",RJ,200");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_dates_are_iso() {
        let records = vec![record("SP", 1.0)];
        let text = String::from_utf8(to_csv(&records, &[Column::PurchaseDate]).unwrap()).unwrap();
        assert_eq!(text, "Data da Compra\n2022-01-15\n");
    }

    #[test]
    fn test_empty_selection_still_has_header() {
        let text = String::from_utf8(to_csv(std::iter::empty(), &Column::ALL).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Produto,Categoria do Produto,"));
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name("dados"), "dados.csv");
        assert_eq!(csv_file_name("vendas.CSV"), "vendas.CSV");
        assert_eq!(csv_file_name("  "), "dados.csv");
    }
}
