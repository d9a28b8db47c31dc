//! Tests for store module

use super::*;
use crate::types::DecodePolicy;
use std::path::PathBuf;
use tempfile::tempdir;

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| (*f).to_string()).collect()
}

fn write_source(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

// ============================================================================
// Parse Tests
// ============================================================================

#[test]
fn test_parse_header_and_rows() {
    let store = RecordStore::parse("id,name\n1,a\n2,b\n", b',').unwrap();

    assert_eq!(store.header(), Some(&row(&["id", "name"])[..]));
    assert_eq!(store.rows(), &[row(&["1", "a"]), row(&["2", "b"])]);
    assert_eq!(store.len(), 2);
    assert!(store.has_data());
    assert!(!store.is_empty());
}

#[test]
fn test_parse_header_only() {
    let store = RecordStore::parse("id,name\n", b',').unwrap();
    assert_eq!(store.header().map(<[String]>::len), Some(2));
    assert_eq!(store.len(), 0);
    assert!(!store.has_data());
}

#[test]
fn test_parse_empty_source() {
    let store = RecordStore::parse("", b',').unwrap();
    assert!(store.header().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_parse_quoted_fields() {
    let text = "id,comment\n1,\"hello, world\"\n2,\"say \"\"hi\"\"\"\n3,\"two\nlines\"\n";
    let store = RecordStore::parse(text, b',').unwrap();

    assert_eq!(
        store.rows(),
        &[
            row(&["1", "hello, world"]),
            row(&["2", "say \"hi\""]),
            row(&["3", "two\nlines"]),
        ]
    );
}

#[test]
fn test_parse_custom_delimiters() {
    let store = RecordStore::parse("a\tb\n1\t2\n", b'\t').unwrap();
    assert_eq!(store.rows(), &[row(&["1", "2"])]);

    let store = RecordStore::parse("a|b\n1|2,3\n", b'|').unwrap();
    assert_eq!(store.rows(), &[row(&["1", "2,3"])]);
}

#[test]
fn test_parse_ragged_rows() {
    let store = RecordStore::parse("a,b,c\n1\n1,2,3,4\n", b',').unwrap();
    assert_eq!(store.rows(), &[row(&["1"]), row(&["1", "2", "3", "4"])]);
}

#[test]
fn test_parse_crlf_input() {
    let store = RecordStore::parse("a,b\r\n1,2\r\n3,4\r\n", b',').unwrap();
    assert_eq!(store.rows(), &[row(&["1", "2"]), row(&["3", "4"])]);
}

#[test]
fn test_parse_preserves_order() {
    let text: String = std::iter::once("n".to_string())
        .chain((0..500).map(|i| i.to_string()))
        .map(|line| line + "\n")
        .collect();
    let store = RecordStore::parse(&text, b',').unwrap();

    let values: Vec<usize> = store
        .rows()
        .iter()
        .map(|r| r[0].parse().unwrap())
        .collect();
    assert_eq!(values, (0..500).collect::<Vec<_>>());
}

// ============================================================================
// Load Tests
// ============================================================================

#[test]
fn test_load_utf8_with_bom() {
    let dir = tempdir().unwrap();
    let path = write_source(dir.path(), "bom.csv", b"\xEF\xBB\xBFid,name\n1,\xC3\xA9\n");

    let store = RecordStore::load(&path, &CsvFormat::default()).unwrap();
    assert_eq!(store.header(), Some(&row(&["id", "name"])[..]));
    assert_eq!(store.rows(), &[row(&["1", "é"])]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = RecordStore::load(dir.path().join("nope.csv"), &CsvFormat::default()).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn test_load_strict_rejects_malformed_bytes() {
    let dir = tempdir().unwrap();
    let path = write_source(dir.path(), "bad.csv", b"id,name\n1,caf\xE9\n");

    let err = RecordStore::load(&path, &CsvFormat::default()).unwrap_err();
    assert!(matches!(err, Error::Decode { ref encoding, .. } if encoding == "UTF-8"));
}

#[test]
fn test_load_replace_substitutes_malformed_bytes() {
    let dir = tempdir().unwrap();
    let path = write_source(dir.path(), "bad.csv", b"id,name\n1,caf\xE9\n");

    let format = CsvFormat::default().with_decode_policy(DecodePolicy::Replace);
    let store = RecordStore::load(&path, &format).unwrap();
    assert_eq!(store.rows(), &[row(&["1", "caf\u{FFFD}"])]);
}

#[test]
fn test_load_windows_1252() {
    let dir = tempdir().unwrap();
    let path = write_source(dir.path(), "latin.csv", b"id;name\n1;caf\xE9\n");

    let format = CsvFormat::default()
        .with_delimiter(b';')
        .with_encoding(encoding_rs::WINDOWS_1252);
    let store = RecordStore::load(&path, &format).unwrap();
    assert_eq!(store.rows(), &[row(&["1", "café"])]);
}

#[test]
fn test_decode_source_passes_clean_input() {
    let text = decode_source(
        Path::new("x.csv"),
        b"a,b\n",
        encoding_rs::UTF_8,
        DecodePolicy::Strict,
    )
    .unwrap();
    assert_eq!(text, "a,b\n");
}

// ============================================================================
// Blank Line Tests
// ============================================================================

#[test]
fn test_blank_lines_are_not_records() {
    let dir = tempdir().unwrap();
    let path = write_source(dir.path(), "gaps.csv", b"name\nalice\n\nbob\n");

    let store = RecordStore::load(&path, &CsvFormat::default()).unwrap();
    assert_eq!(store.rows(), &[row(&["alice"]), row(&["bob"])]);
    assert_eq!(blank_lines("name\nalice\n\nbob\n"), 1);
}

#[test]
fn test_blank_lines_counts_crlf_and_leading() {
    assert_eq!(blank_lines("\r\nid\r\n1\r\n\r\n\r\n2\r\n"), 3);
}

#[test]
fn test_blank_lines_ignores_quoted_newlines() {
    assert_eq!(blank_lines("id,note\n1,\"first\n\nsecond\"\n"), 0);
}

#[test]
fn test_blank_lines_none() {
    assert_eq!(blank_lines("id\n1\n2"), 0);
    assert_eq!(blank_lines(""), 0);
}

#[test]
fn test_load_utf16_byte_order_follows_bom() {
    let dir = tempdir().unwrap();
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend("id\n1\n".encode_utf16().flat_map(u16::to_be_bytes));
    let path = write_source(dir.path(), "wide.csv", &bytes);

    let label = crate::config::parse_encoding("utf-16").unwrap();
    let store = RecordStore::load(&path, &CsvFormat::default().with_encoding(label)).unwrap();
    assert_eq!(store.header(), Some(&row(&["id"])[..]));
    assert_eq!(store.rows(), &[row(&["1"])]);
}
