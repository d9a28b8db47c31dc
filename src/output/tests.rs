//! Tests for output module

use super::*;
use crate::config::CsvFormat;
use crate::error::Error;
use crate::types::{DecodePolicy, LineTerminator, Row};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| (*f).to_string()).collect()
}

// ============================================================================
// Naming Tests
// ============================================================================

#[test]
fn test_naming_from_source() {
    let naming = ChunkNaming::from_source("/data/exports/orders.csv").unwrap();
    assert_eq!(naming.directory(), Path::new("/data/exports"));
    assert_eq!(naming.file_name(1), "orders(1).csv");
    assert_eq!(
        naming.path_for(12),
        PathBuf::from("/data/exports/orders(12).csv")
    );
}

#[test]
fn test_naming_relative_source() {
    let naming = ChunkNaming::from_source("orders.txt").unwrap();
    assert_eq!(naming.path_for(2), PathBuf::from("orders(2).txt"));
}

#[test]
fn test_naming_without_extension() {
    let naming = ChunkNaming::from_source("dir/orders").unwrap();
    assert_eq!(naming.file_name(3), "orders(3)");
}

#[test]
fn test_naming_keeps_inner_dots() {
    let naming = ChunkNaming::from_source("dir/orders.2024.tsv").unwrap();
    assert_eq!(naming.file_name(1), "orders.2024(1).tsv");
}

#[test]
fn test_naming_no_padding() {
    let naming = ChunkNaming::from_source("a.csv").unwrap();
    assert_eq!(naming.file_name(100), "a(100).csv");
}

#[test]
fn test_naming_with_directory() {
    let naming = ChunkNaming::from_source("/in/orders.csv")
        .unwrap()
        .with_directory("/out");
    assert_eq!(naming.path_for(1), PathBuf::from("/out/orders(1).csv"));
}

#[test]
fn test_naming_rejects_non_file() {
    assert!(ChunkNaming::from_source("/").is_err());
}

// ============================================================================
// EncodingWriter Tests
// ============================================================================

#[test]
fn test_encoding_writer_windows_1252() {
    let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1252, DecodePolicy::Strict);
    writer.write_all("café".as_bytes()).unwrap();
    assert_eq!(writer.into_inner().unwrap(), b"caf\xE9".to_vec());
}

#[test]
fn test_encoding_writer_split_character() {
    let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1252, DecodePolicy::Strict);
    let bytes = "é!".as_bytes();
    writer.write_all(&bytes[..1]).unwrap();
    assert!(writer.get_ref().is_empty());
    writer.write_all(&bytes[1..]).unwrap();
    assert_eq!(writer.into_inner().unwrap(), b"\xE9!".to_vec());
}

#[test]
fn test_encoding_writer_incomplete_tail() {
    let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1252, DecodePolicy::Strict);
    writer.write_all(&"é".as_bytes()[..1]).unwrap();
    assert!(writer.into_inner().is_err());
}

#[test]
fn test_encoding_writer_unmappable() {
    let mut strict =
        EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1252, DecodePolicy::Strict);
    assert!(strict.write_all("€ ✓".as_bytes()).is_err());

    let mut replace =
        EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1252, DecodePolicy::Replace);
    replace.write_all("✓".as_bytes()).unwrap();
    assert_eq!(replace.into_inner().unwrap(), b"&#10003;".to_vec());
}

#[test]
fn test_encoding_writer_utf16le() {
    let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::UTF_16LE, DecodePolicy::Strict);
    writer.write_all("a,é".as_bytes()).unwrap();
    assert_eq!(
        writer.into_inner().unwrap(),
        vec![0xFF, 0xFE, b'a', 0, b',', 0, 0xE9, 0]
    );
}

#[test]
fn test_encoding_writer_utf16be_bom_written_once() {
    let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::UTF_16BE, DecodePolicy::Strict);
    writer.write_all(b"a").unwrap();
    writer.write_all(b"b").unwrap();
    assert_eq!(
        writer.into_inner().unwrap(),
        vec![0xFE, 0xFF, 0, b'a', 0, b'b']
    );
}

#[test]
fn test_utf16_chunk_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide(1).csv");
    let format = CsvFormat::default().with_encoding(encoding_rs::UTF_16BE);

    let mut sink = CsvSink::create(1, &path, &format).unwrap();
    sink.write_header(&row(&["id", "name"])).unwrap();
    sink.write_row(&row(&["1", "é"])).unwrap();
    sink.finish().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFE, 0xFF]);

    // The mark wins over the label's byte order
    let (text, _, had_errors) = encoding_rs::UTF_16LE.decode(&bytes);
    assert!(!had_errors);
    assert_eq!(text, "id,name\r\n1,é\r\n");
}

// ============================================================================
// CsvSink Tests
// ============================================================================

#[test]
fn test_sink_writes_header_and_rows_crlf() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out(1).csv");

    let mut sink = CsvSink::create(1, &path, &CsvFormat::default()).unwrap();
    sink.write_header(&row(&["id", "name"])).unwrap();
    sink.write_row(&row(&["1", "a"])).unwrap();
    sink.write_row(&row(&["2", "b, c"])).unwrap();
    assert_eq!(sink.rows_written(), 2);
    assert_eq!(sink.index(), 1);
    assert_eq!(sink.path(), path.as_path());

    let summary = sink.finish().unwrap();
    assert_eq!(
        summary,
        ChunkSummary {
            index: 1,
            rows: 2,
            path: Some(path.clone()),
        }
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "id,name\r\n1,a\r\n2,\"b, c\"\r\n"
    );
}

#[test]
fn test_sink_lf_and_custom_delimiter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out(1).tsv");
    let format = CsvFormat::default()
        .with_delimiter(b'\t')
        .with_line_terminator(LineTerminator::Lf);

    let mut sink = CsvSink::create(1, &path, &format).unwrap();
    sink.write_row(&row(&["a", "b c", "d"])).unwrap();
    sink.write_row(&row(&["1"])).unwrap();
    sink.finish().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb c\td\n1\n");
}

#[test]
fn test_sink_quotes_embedded_newlines_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out(1).csv");

    let mut sink = CsvSink::create(1, &path, &CsvFormat::default()).unwrap();
    sink.write_row(&row(&["1", "two\nlines"])).unwrap();
    sink.finish().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1,\"two\nlines\"\r\n");
}

#[test]
fn test_sink_encodes_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out(1).csv");
    let format = CsvFormat::default().with_encoding(encoding_rs::WINDOWS_1252);

    let mut sink = CsvSink::create(1, &path, &format).unwrap();
    sink.write_row(&row(&["1", "café"])).unwrap();
    sink.finish().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"1,caf\xE9\r\n".to_vec());
}

#[test]
fn test_sink_unmappable_is_write_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out(4).csv");
    let format = CsvFormat::default().with_encoding(encoding_rs::WINDOWS_1252);

    let mut sink = CsvSink::create(4, &path, &format).unwrap();
    let result = sink
        .write_row(&row(&["✓"]))
        .and_then(|()| sink.finish().map(|_| ()));
    assert!(matches!(result.unwrap_err(), Error::Write { chunk: 4, .. }));
}

#[test]
fn test_sink_create_in_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out(2).csv");

    let err = CsvSink::create(2, &path, &CsvFormat::default())
        .err()
        .unwrap();
    assert!(matches!(err, Error::Write { chunk: 2, .. }));
}

// ============================================================================
// FileRotator Tests
// ============================================================================

#[test]
fn test_rotator_writes_header_per_chunk() {
    let dir = tempdir().unwrap();
    let naming = ChunkNaming::from_source(dir.path().join("data.csv")).unwrap();
    let mut rotator = FileRotator::new(naming, CsvFormat::default());
    let header = row(&["h1", "h2"]);

    for index in 1..=2 {
        let mut sink = rotator.open(index, Some(&header)).unwrap();
        sink.write_row(&row(&["x", "y"])).unwrap();
        rotator.close(sink).unwrap();
    }

    for index in 1..=2 {
        let content = fs::read_to_string(dir.path().join(format!("data({index}).csv"))).unwrap();
        assert_eq!(content, "h1,h2\r\nx,y\r\n");
    }
}

#[test]
fn test_rotator_without_header() {
    let dir = tempdir().unwrap();
    let naming = ChunkNaming::from_source(dir.path().join("data.csv")).unwrap();
    let mut rotator = FileRotator::new(naming, CsvFormat::default());

    let sink = rotator.open(1, None).unwrap();
    let summary = rotator.close(sink).unwrap();
    assert_eq!(summary.rows, 0);
    assert_eq!(fs::read_to_string(dir.path().join("data(1).csv")).unwrap(), "");
}

#[test]
fn test_rotator_overwrites_existing_chunk() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("data(1).csv");
    let mut stale = fs::File::create(&existing).unwrap();
    writeln!(stale, "stale,content,that,is,longer").unwrap();
    drop(stale);

    let naming = ChunkNaming::from_source(dir.path().join("data.csv")).unwrap();
    let mut rotator = FileRotator::new(naming, CsvFormat::default());
    let mut sink = rotator.open(1, None).unwrap();
    sink.write_row(&row(&["new"])).unwrap();
    rotator.close(sink).unwrap();

    assert_eq!(fs::read_to_string(&existing).unwrap(), "new\r\n");
}
