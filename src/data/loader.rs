use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use super::model::{Dataset, Record, MAX_RATING};
use crate::config::DataSource;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the session dataset from the configured source.
///
/// Any failure (network, HTTP status, malformed payload) is reported as
/// [`DashboardError::SourceUnavailable`]; no partial dataset is returned.
pub fn load_dataset(source: &DataSource, timeout: Duration) -> Result<Dataset, DashboardError> {
    let result = match source {
        DataSource::Http(url) => fetch_http(url, timeout),
        DataSource::File(path) => load_file(path),
    };

    result.map_err(|e| DashboardError::SourceUnavailable {
        source_name: source.describe(),
        reason: format!("{e:#}"),
    })
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

fn fetch_http(url: &str, timeout: Duration) -> Result<Dataset> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")?;

    log::info!("Fetching sales data from {url}");

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .context("sending request")?;

    if !response.status().is_success() {
        bail!("API error: {}", response.status());
    }

    let records: Vec<Record> = response.json().context("parsing JSON response")?;
    validate_records(records)
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

fn load_file(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_records(&text)
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

/// Parse the API payload: a top-level JSON array of flat sale objects.
pub fn parse_records(json: &str) -> Result<Dataset> {
    let records: Vec<Record> = serde_json::from_str(json).context("parsing JSON")?;
    validate_records(records)
}

/// Reject rows serde cannot rule out on its own.
fn validate_records(records: Vec<Record>) -> Result<Dataset> {
    for (i, rec) in records.iter().enumerate() {
        if rec.rating > MAX_RATING {
            bail!("Row {i}: rating {} outside 0..={MAX_RATING}", rec.rating);
        }
    }

    Ok(Dataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_json;

    #[test]
    fn test_parse_sample_payload() {
        let ds = parse_records(sample_json()).expect("sample should parse");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].seller, "Thiago Silva");
    }

    #[test]
    fn test_empty_array_is_an_empty_dataset() {
        let ds = parse_records("[]").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_non_array_payload_is_rejected() {
        assert!(parse_records(r#"{"error": "down"}"#).is_err());
        assert!(parse_records("").is_err());
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let json = sample_json().replace(r#""Avaliação da compra": 5"#, r#""Avaliação da compra": 6"#);
        let err = parse_records(&json).unwrap_err();
        assert!(format!("{err:#}").contains("rating 6"));
    }

    #[test]
    fn test_decoded_records_are_validated() {
        use crate::data::model::fixtures::record;

        let mut bad = record("SP", 10.0);
        bad.rating = 9;
        let err = validate_records(vec![record("RJ", 5.0), bad]).unwrap_err();
        assert!(err.to_string().starts_with("Row 1: rating 9"));

        let ds = validate_records(vec![record("RJ", 5.0)]).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let source = DataSource::File("definitely/not/here.json".into());
        let result = load_dataset(&source, Duration::from_secs(1));
        match result {
            Err(DashboardError::SourceUnavailable { source_name, reason }) => {
                assert_eq!(source_name, "definitely/not/here.json");
                assert!(reason.contains("reading JSON file"));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }
}
