//! Integration tests for exporter module

#[path = "common/mod.rs"]
mod common;

use common::*;
use eu_sanctions_cli::exporter;
use eu_sanctions_cli::filter::{apply_filter, FilterSpec};
use eu_sanctions_cli::models::{EntryType, SanctionEntry};
use eu_sanctions_cli::parser;
use tempfile::TempDir;

fn read_back(csv_text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = rdr
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_export_round_trip_with_commas_and_quotes() {
    let mut tricky = entry("O'Brien, \"Big\" Jim", EntryType::Person, "Ireland");
    tricky.remarks = "Line one\nLine two, with comma".to_string();
    tricky.program = "IRL".to_string();
    let entries = vec![tricky, entry("Plain Name", EntryType::Entity, "")];

    let csv_text = exporter::to_csv_string(&entries).unwrap();
    let (headers, rows) = read_back(&csv_text);

    assert_eq!(
        headers,
        vec![
            "name",
            "type",
            "country",
            "publicationDate",
            "program",
            "remarks",
            "publicationUrl"
        ]
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "O'Brien, \"Big\" Jim");
    assert_eq!(rows[0][1], "Person");
    assert_eq!(rows[0][2], "Ireland");
    assert_eq!(rows[0][4], "IRL");
    assert_eq!(rows[0][5], "Line one\nLine two, with comma");
    assert_eq!(rows[1][0], "Plain Name");
    assert_eq!(rows[1][1], "Entity");
    assert_eq!(rows[1][2], "");
}

#[test]
fn test_export_parsed_feed_round_trip() {
    let entries = parser::parse_document(SAMPLE_EXPORT.as_bytes()).unwrap();
    let csv_text = exporter::to_csv_string(&entries).unwrap();
    let (_, rows) = read_back(&csv_text);

    assert_eq!(rows.len(), entries.len());
    for (row, entry) in rows.iter().zip(&entries) {
        assert_eq!(row[0], entry.name);
        assert_eq!(row[1], entry.entry_type.display_name());
        assert_eq!(row[2], entry.country);
        assert_eq!(row[3], entry.publication_date_text());
        assert_eq!(row[4], entry.program);
        assert_eq!(row[5], entry.remarks);
        assert_eq!(row[6], entry.publication_url);
    }
    assert_eq!(rows[1][0], "Acme Corp, Ltd");
    assert_eq!(rows[0][3], "2022-02-23");
}

#[test]
fn test_export_filtered_view_keeps_order() {
    let entries = parser::parse_document(SAMPLE_EXPORT.as_bytes()).unwrap();
    let spec = FilterSpec {
        entry_type: Some(EntryType::Person),
        ..FilterSpec::default()
    };
    let result = apply_filter(&entries, &spec);

    let csv_text = exporter::to_csv_string(result.iter()).unwrap();
    let (_, rows) = read_back(&csv_text);
    let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Jane Doe", "Jan Doe"]);
}

#[test]
fn test_export_to_path_writes_utf8_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("eu_sanctions.csv");
    let entries: Vec<SanctionEntry> = vec![entry("Müller GmbH", EntryType::Entity, "Österreich")];

    let rows = exporter::export_to_path(&path, &entries).unwrap();
    assert_eq!(rows, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    let (_, parsed) = read_back(&content);
    assert_eq!(parsed[0][0], "Müller GmbH");
    assert_eq!(parsed[0][2], "Österreich");
}

#[test]
fn test_export_empty_sequence_is_header_only() {
    let entries: Vec<SanctionEntry> = Vec::new();
    let csv_text = exporter::to_csv_string(&entries).unwrap();
    let (headers, rows) = read_back(&csv_text);
    assert_eq!(headers.len(), 7);
    assert!(rows.is_empty());
}
