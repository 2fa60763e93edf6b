use screening_storage::Table;
use screening_storage::source::{FileCsvSource, MemorySource, SourceLocation, TableSource};

#[test]
fn parses_csv_with_bom_and_ragged_rows() {
    let text = "\u{feff}Позначка часу, ПІБ ,Дата народження,[PHQ] 1\n\
                01.10.2026 10:00:00,Іваненко Іван,01.02.1970,Майже кожного дня\n\
                01.10.2026 11:00:00,Петренко Петро\n";
    let table = Table::from_csv_str(text).unwrap();

    assert_eq!(table.headers, vec!["Позначка часу", "ПІБ", "Дата народження", "[PHQ] 1"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("ПІБ"), Some(1));
    assert_eq!(table.cell(0, 3), Some("Майже кожного дня"));
    assert_eq!(table.cell(1, 2), None);
}

#[test]
fn blank_lines_are_skipped() {
    let table = Table::from_csv_str("a,b\n1,2\n,\n3,4\n").unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn quoted_commas_survive_a_write_and_read() {
    let table = Table::with_rows(&["ПІБ", "Примітка"], &[&["Коваль Анна", "так, але рідко"]]);
    let bytes = table.to_csv_bytes().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(Table::from_csv_str(&text).unwrap(), table);
}

#[test]
fn file_source_reads_and_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doctor.csv");
    std::fs::write(&path, "ПІБ,Дата народження\nКоваль Анна,03.04.1980\n").unwrap();

    let source = FileCsvSource::new(&path);
    assert_eq!(source.fetch().unwrap().len(), 1);

    let missing = FileCsvSource::new(dir.path().join("nope.csv"));
    assert!(missing.fetch().is_err());
}

#[test]
fn memory_source_can_be_replaced() {
    let source = MemorySource::new("patients", Table::with_rows(&["a"], &[&["1"]]));
    assert_eq!(source.fetch().unwrap().len(), 1);

    source.replace(Table::with_rows(&["a"], &[&["1"], &["2"]]));
    assert_eq!(source.fetch().unwrap().len(), 2);
    assert_eq!(source.describe(), "memory:patients");
}

#[test]
fn source_location_config_shape() {
    let url: SourceLocation = serde_json::from_str(r#"{"url": "https://example.org/export?format=csv"}"#).unwrap();
    assert_eq!(url, SourceLocation::Url("https://example.org/export?format=csv".to_string()));

    let path: SourceLocation = serde_json::from_str(r#"{"path": "/data/doctor.csv"}"#).unwrap();
    assert_eq!(path.to_string(), "/data/doctor.csv");
}
